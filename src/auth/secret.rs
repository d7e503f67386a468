use serde::{Deserialize, Serialize};

/// Sentinel value used in every field of a placeholder document.
pub const PLACEHOLDER: &str = "placeholder";

const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The provider's standard client-secret document.
///
/// Accepts both the wrapped form Google ships (`{"web": {...}}` or
/// `{"installed": {...}}`) and the flat object via [`ClientSecret::from_json`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl ClientSecret {
    /// Parse a client-secret document, unwrapping Google's `web`/`installed`
    /// envelope when present.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let inner = value
            .get("web")
            .or_else(|| value.get("installed"))
            .cloned()
            .unwrap_or(value);
        serde_json::from_value(inner)
    }

    /// A syntactically valid but semantically inert document, constructed in
    /// memory at startup. Never written to disk: a later secret mount must not
    /// find a stale placeholder file in its way.
    pub fn placeholder() -> Self {
        Self {
            client_id: PLACEHOLDER.to_string(),
            client_secret: PLACEHOLDER.to_string(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
            redirect_uris: Vec::new(),
        }
    }

    /// True iff this document carries sentinel values. A placeholder must
    /// never be treated as valid for production authentication.
    pub fn is_placeholder(&self) -> bool {
        self.client_id == PLACEHOLDER || self.client_secret == PLACEHOLDER
    }
}

// Keeps the secret out of logs; only the client_id is operationally useful.
impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &if self.client_secret.is_empty() {
                    "[empty]"
                } else {
                    "[REDACTED]"
                },
            )
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}
