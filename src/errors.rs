use thiserror::Error;

use crate::auth::CredentialError;
use crate::config::ResolutionError;

/// Typed error hierarchy for the server's startup path.
///
/// Use at module boundaries (resolution, credential loading, the gateway).
/// Internal/leaf functions can continue using `anyhow::Result` — the `Internal`
/// variant allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServerResult<T> = std::result::Result<T, ServerError>;
