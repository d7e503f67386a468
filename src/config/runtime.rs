//! Server flags orthogonal to the credential source.

use std::collections::HashMap;

use serde::Serialize;

use super::credentials::parse_flag;
use super::{ResolutionError, ENV_EMAIL_IN_HEADER, ENV_PORT, ENV_TOOLS};

const DEFAULT_PORT: u16 = 8000;

/// Runtime flags independent of how credentials are sourced. Built once from
/// the environment snapshot, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeOptions {
    /// HTTP listen port.
    pub port: u16,
    /// Enabled tool identifiers in the order the operator listed them.
    /// Empty means "all tools".
    pub enabled_tools: Vec<String>,
    /// Read the caller's email from the `x-user-email` header instead of
    /// token introspection.
    pub email_in_header: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            enabled_tools: Vec::new(),
            email_in_header: false,
        }
    }
}

impl RuntimeOptions {
    /// Resolve runtime options from an environment snapshot. Fatal on a
    /// malformed port or flag, same as the credential resolver: operator
    /// typos are errors, not defaults.
    pub fn resolve(env: &HashMap<String, String>) -> Result<Self, ResolutionError> {
        let port = match env.get(ENV_PORT).map(String::as_str) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ResolutionError::InvalidValue {
                    name: ENV_PORT,
                    value: raw.to_string(),
                    reason: "expected an integer in 1..=65535".to_string(),
                })?,
        };

        let enabled_tools = env
            .get(ENV_TOOLS)
            .map(String::as_str)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            port,
            enabled_tools,
            email_in_header: parse_flag(env, ENV_EMAIL_IN_HEADER)?,
        })
    }
}
