//! Workspace tool registry.
//!
//! Each tool id maps to the OAuth scopes it needs; the enabled set is decided
//! once from [`RuntimeOptions::enabled_tools`] and shared read-only.

use tracing::warn;

use crate::config::RuntimeOptions;

/// Scopes required regardless of which tools are enabled (sign-in identity).
pub const BASE_SCOPES: &[&str] = &[
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// A Workspace capability and the scopes it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub id: &'static str,
    pub scopes: &'static [&'static str],
}

/// All tools this server knows how to expose.
pub const WORKSPACE_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        id: "gmail",
        scopes: &["https://www.googleapis.com/auth/gmail.modify"],
    },
    ToolSpec {
        id: "drive",
        scopes: &["https://www.googleapis.com/auth/drive"],
    },
    ToolSpec {
        id: "calendar",
        scopes: &["https://www.googleapis.com/auth/calendar"],
    },
    ToolSpec {
        id: "docs",
        scopes: &["https://www.googleapis.com/auth/documents"],
    },
    ToolSpec {
        id: "sheets",
        scopes: &["https://www.googleapis.com/auth/spreadsheets"],
    },
    ToolSpec {
        id: "chat",
        scopes: &["https://www.googleapis.com/auth/chat.messages"],
    },
    ToolSpec {
        id: "forms",
        scopes: &["https://www.googleapis.com/auth/forms.body"],
    },
    ToolSpec {
        id: "slides",
        scopes: &["https://www.googleapis.com/auth/presentations"],
    },
    ToolSpec {
        id: "tasks",
        scopes: &["https://www.googleapis.com/auth/tasks"],
    },
    ToolSpec {
        id: "search",
        scopes: &["https://www.googleapis.com/auth/cse"],
    },
];

/// The set of tools enabled for this process.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    enabled: Vec<&'static ToolSpec>,
}

impl ToolRegistry {
    /// Build the registry from runtime options. An empty `TOOLS` list enables
    /// everything; unknown identifiers are skipped with a warning rather than
    /// aborting startup.
    pub fn from_options(options: &RuntimeOptions) -> Self {
        if options.enabled_tools.is_empty() {
            return Self {
                enabled: WORKSPACE_TOOLS.iter().collect(),
            };
        }

        let mut enabled = Vec::new();
        for id in &options.enabled_tools {
            match WORKSPACE_TOOLS.iter().find(|t| t.id == id.as_str()) {
                Some(tool) if !enabled.contains(&tool) => enabled.push(tool),
                Some(_) => {}
                None => warn!("unknown tool {:?} in TOOLS, skipping", id),
            }
        }
        Self { enabled }
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ToolSpec> {
        self.enabled.iter().copied()
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|t| t.id == id)
    }

    /// Base scopes plus the scopes of every enabled tool, deduplicated,
    /// in registration order.
    pub fn required_scopes(&self) -> Vec<&'static str> {
        let mut scopes: Vec<&'static str> = BASE_SCOPES.to_vec();
        for tool in &self.enabled {
            for scope in tool.scopes {
                if !scopes.contains(scope) {
                    scopes.push(scope);
                }
            }
        }
        scopes
    }
}
