//! Startup configuration, resolved once from the process environment.
//!
//! Everything in here is constructed on the single startup path before any
//! listener binds, and is immutable for the process lifetime. Operators change
//! configuration by restarting the process, never by hot reload.

mod credentials;
mod runtime;

pub use credentials::{resolve, CredentialSource, CredentialSourceConfig, ResolutionError};
pub use runtime::RuntimeOptions;

use std::collections::HashMap;

/// Listen port for the HTTP interface (1–65535, default 8000).
pub const ENV_PORT: &str = "WORKSPACE_MCP_PORT";
/// Base URI used to build the OAuth redirect target. Always required.
pub const ENV_CALLBACK_BASE_URI: &str = "OAUTH_CALLBACK_BASE_URI";
/// Comma-delimited list of enabled tool identifiers. Empty means "all".
pub const ENV_TOOLS: &str = "TOOLS";
/// `"1"` reads the caller's email from the `x-user-email` request header.
pub const ENV_EMAIL_IN_HEADER: &str = "EMAIL_IN_HEADER";
/// `"1"` selects parameter-store credential mode.
pub const ENV_SSM_ENABLE: &str = "CREDENTIALS_SSM_PARAMETERS_ENABLE";
/// Parameter-store path prefix under which credential values are stored.
pub const ENV_SSM_PREFIX: &str = "CREDENTIALS_SSM_PARAMETERS_PREFIX";
/// Key identifier used to decrypt parameter-store values. Optional.
pub const ENV_SSM_KMS_KEY: &str = "CREDENTIALS_SSM_KMS_KEY";
/// In-container path of the mounted client-secret document. Selects
/// mounted-file credential mode when non-empty (and SSM mode is off).
pub const ENV_CLIENT_SECRET_PATH: &str = "GOOGLE_CLIENT_SECRET_PATH";

/// Snapshot the process environment into the plain map the resolvers consume.
///
/// Resolution itself never touches process globals, so tests can feed
/// hand-built maps without `set_var` races.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}
