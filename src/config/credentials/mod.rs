//! Credential-source resolution.
//!
//! At startup the server must decide how it will obtain its OAuth client
//! credentials: from a mounted secret file, from the SSM parameter store, or
//! from an inert in-memory placeholder. The decision is made exactly once,
//! from a flat map of environment values, with no filesystem or network
//! access — actual secret retrieval happens later in [`crate::auth::loader`].
//!
//! Mode selection is a tagged variant rather than a set of independent flags,
//! so a config that is simultaneously "mounted" and "parameter store" is
//! unrepresentable.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

use super::{ENV_CALLBACK_BASE_URI, ENV_CLIENT_SECRET_PATH, ENV_SSM_ENABLE, ENV_SSM_KMS_KEY, ENV_SSM_PREFIX};

/// Where the running server obtains its OAuth client credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CredentialSource {
    /// Read the client-secret document from a secret volume mounted into the
    /// container. The path must exist at startup; absence is fatal.
    MountedFile { path: PathBuf },
    /// Fetch credential values from the SSM parameter store under a path
    /// prefix, optionally decrypted with a specific KMS key.
    SsmParameters {
        prefix: String,
        kms_key_id: Option<String>,
    },
    /// No real credentials configured. The server starts with a syntactically
    /// valid but semantically inert document; every OAuth exchange will fail
    /// loudly until an operator supplies credentials and restarts.
    PlaceholderLazy,
}

impl CredentialSource {
    /// Short mode name for logs and the health endpoint.
    pub fn mode_name(&self) -> &'static str {
        match self {
            CredentialSource::MountedFile { .. } => "mounted-file",
            CredentialSource::SsmParameters { .. } => "ssm-parameters",
            CredentialSource::PlaceholderLazy => "placeholder",
        }
    }
}

/// The resolved credential strategy, immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialSourceConfig {
    #[serde(flatten)]
    pub source: CredentialSource,
    pub callback_base_uri: Url,
}

impl CredentialSourceConfig {
    /// The OAuth redirect target the server registers with the provider:
    /// `{callback_base_uri}/oauth2callback`.
    pub fn oauth_redirect_uri(&self) -> Url {
        let mut uri = self.callback_base_uri.clone();
        if let Ok(mut segments) = uri.path_segments_mut() {
            segments.pop_if_empty().push("oauth2callback");
        }
        uri
    }
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Both credential sources were enabled at once. The resolver itself
    /// applies parameter-store precedence and only warns, but the conflict is
    /// part of the error taxonomy for callers that treat it as fatal.
    #[error("conflicting credential sources: {0}")]
    ConflictingSources(String),

    #[error("missing required configuration: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("malformed URI in {field}: {value:?}: {reason}")]
    MalformedUri {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// An enabling flag was set to something other than a recognized boolean.
    /// Malformed input is an error, not a fallback trigger — a typo in
    /// `CREDENTIALS_SSM_PARAMETERS_ENABLE` must never silently select
    /// placeholder mode in production.
    #[error("unrecognized value for {name}: {value:?} (expected \"1\" or \"0\")")]
    MalformedFlag { name: &'static str, value: String },

    #[error("invalid value for {name}: {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Strict boolean flag parse: unset and empty are off, nothing else is guessed.
pub(super) fn parse_flag(
    env: &HashMap<String, String>,
    name: &'static str,
) -> Result<bool, ResolutionError> {
    match env.get(name).map(String::as_str) {
        None | Some("" | "0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => Err(ResolutionError::MalformedFlag {
            name,
            value: other.to_string(),
        }),
    }
}

fn non_empty<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

/// Resolve the credential source from an environment snapshot.
///
/// Precedence: the parameter-store flag wins over a configured mount path.
/// When both are present the mount path is ignored with a warning, so an
/// operator mistake shows up in the logs instead of being masked.
pub fn resolve(env: &HashMap<String, String>) -> Result<CredentialSourceConfig, ResolutionError> {
    let ssm_enabled = parse_flag(env, ENV_SSM_ENABLE)?;
    let mounted_path = non_empty(env, ENV_CLIENT_SECRET_PATH);

    let source = if ssm_enabled {
        if let Some(path) = mounted_path {
            warn!(
                "both {} and {} are set; parameter store takes precedence, ignoring mounted path {}",
                ENV_SSM_ENABLE, ENV_CLIENT_SECRET_PATH, path
            );
        }
        let prefix = non_empty(env, ENV_SSM_PREFIX)
            .ok_or(ResolutionError::MissingRequiredField { field: ENV_SSM_PREFIX })?;
        CredentialSource::SsmParameters {
            prefix: prefix.to_string(),
            kms_key_id: non_empty(env, ENV_SSM_KMS_KEY).map(str::to_string),
        }
    } else if let Some(path) = mounted_path {
        CredentialSource::MountedFile {
            path: PathBuf::from(path),
        }
    } else {
        CredentialSource::PlaceholderLazy
    };

    // The callback base URI is required in every mode: without it the OAuth
    // redirect cannot be constructed, placeholder credentials or not.
    let raw_uri = non_empty(env, ENV_CALLBACK_BASE_URI).ok_or(
        ResolutionError::MissingRequiredField {
            field: ENV_CALLBACK_BASE_URI,
        },
    )?;
    let callback_base_uri = Url::parse(raw_uri).map_err(|e| ResolutionError::MalformedUri {
        field: ENV_CALLBACK_BASE_URI,
        value: raw_uri.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(callback_base_uri.scheme(), "http" | "https") {
        return Err(ResolutionError::MalformedUri {
            field: ENV_CALLBACK_BASE_URI,
            value: raw_uri.to_string(),
            reason: format!("unsupported scheme {:?}", callback_base_uri.scheme()),
        });
    }

    Ok(CredentialSourceConfig {
        source,
        callback_base_uri,
    })
}
