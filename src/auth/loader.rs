//! Credential loading — the collaborator that runs after source resolution.
//!
//! Every failure here is loud and fatal at startup. There is deliberately no
//! fallback from a broken mounted file or an unreachable parameter store to
//! the placeholder document: a server that was told where its credentials
//! live must not come up pretending it has none.

use std::collections::HashMap;
use std::path::PathBuf;

use aws_sdk_ssm::error::{DisplayErrorContext, SdkError};
use aws_sdk_ssm::operation::get_parameters_by_path::GetParametersByPathError;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{CredentialSource, CredentialSourceConfig};

use super::secret::ClientSecret;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unreadable mounted credential file {path}: {source}")]
    UnreadableMountedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid client-secret document from {origin}: {source}")]
    InvalidDocument {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parameter store unavailable under {prefix}: {message}")]
    ParameterStoreUnavailable { prefix: String, message: String },

    #[error("failed to decrypt parameter-store values with KMS key {key_id}: {message}")]
    KmsDecryptFailure { key_id: String, message: String },
}

/// Retrieve the client-secret document from the resolved source.
pub async fn load_client_secret(
    config: &CredentialSourceConfig,
) -> Result<ClientSecret, CredentialError> {
    match &config.source {
        CredentialSource::MountedFile { path } => {
            info!("loading client secret from mounted file {}", path.display());
            load_mounted(path.clone())
        }
        CredentialSource::SsmParameters { prefix, kms_key_id } => {
            info!("loading client secret from parameter store under {}", prefix);
            load_from_ssm(prefix, kms_key_id.as_deref()).await
        }
        CredentialSource::PlaceholderLazy => {
            warn!(
                "no credential source configured; starting with a placeholder document — \
                 OAuth exchanges will fail until an operator supplies credentials and restarts"
            );
            Ok(ClientSecret::placeholder())
        }
    }
}

fn load_mounted(path: PathBuf) -> Result<ClientSecret, CredentialError> {
    let raw = std::fs::read_to_string(&path)
        .map_err(|source| CredentialError::UnreadableMountedFile {
            path: path.clone(),
            source,
        })?;
    ClientSecret::from_json(&raw).map_err(|source| CredentialError::InvalidDocument {
        origin: path.display().to_string(),
        source,
    })
}

async fn load_from_ssm(
    prefix: &str,
    kms_key_id: Option<&str>,
) -> Result<ClientSecret, CredentialError> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_ssm::Client::new(&aws_config);

    let mut values: HashMap<String, String> = HashMap::new();
    let mut next_token: Option<String> = None;
    loop {
        let output = client
            .get_parameters_by_path()
            .path(prefix)
            .with_decryption(true)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_ssm_error(prefix, kms_key_id, e))?;

        for parameter in output.parameters() {
            // Parameters live flat under the prefix: {prefix}/client_id etc.
            if let (Some(name), Some(value)) = (parameter.name(), parameter.value()) {
                let key = name.rsplit('/').next().unwrap_or(name);
                values.insert(key.to_string(), value.to_string());
            }
        }

        next_token = output.next_token().map(str::to_string);
        if next_token.is_none() {
            break;
        }
    }

    secret_from_parameters(prefix, &values)
}

fn secret_from_parameters(
    prefix: &str,
    values: &HashMap<String, String>,
) -> Result<ClientSecret, CredentialError> {
    let required = |key: &str| {
        values
            .get(key)
            .cloned()
            .ok_or_else(|| CredentialError::ParameterStoreUnavailable {
                prefix: prefix.to_string(),
                message: format!("required parameter {key:?} not found under prefix"),
            })
    };

    let mut secret = ClientSecret::placeholder();
    secret.client_id = required("client_id")?;
    secret.client_secret = required("client_secret")?;
    if let Some(auth_uri) = values.get("auth_uri") {
        secret.auth_uri = auth_uri.clone();
    }
    if let Some(token_uri) = values.get("token_uri") {
        secret.token_uri = token_uri.clone();
    }
    if let Some(uris) = values.get("redirect_uris") {
        secret.redirect_uris = uris
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect();
    }
    Ok(secret)
}

fn classify_ssm_error(
    prefix: &str,
    kms_key_id: Option<&str>,
    err: SdkError<GetParametersByPathError>,
) -> CredentialError {
    let kms_failure = err
        .as_service_error()
        .is_some_and(GetParametersByPathError::is_invalid_key_id);
    let message = DisplayErrorContext(err).to_string();
    if kms_failure {
        CredentialError::KmsDecryptFailure {
            key_id: kms_key_id.unwrap_or("provider-default").to_string(),
            message,
        }
    } else {
        CredentialError::ParameterStoreUnavailable {
            prefix: prefix.to_string(),
            message,
        }
    }
}
