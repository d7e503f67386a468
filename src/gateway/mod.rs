//! HTTP surface for the Workspace MCP server.
//!
//! The gateway binds only after credential-source resolution and credential
//! loading have both succeeded — a misconfigured process exits non-zero
//! before any listener opens, so orchestration restart policies can tell
//! misconfiguration apart from runtime crashes.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, info, warn};

use crate::auth::ClientSecret;
use crate::config::{CredentialSourceConfig, RuntimeOptions};
use crate::tools::ToolRegistry;

/// Header carrying the caller's email when `EMAIL_IN_HEADER` is enabled.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Read-only state shared across handlers. Everything here was resolved once
/// at startup; handlers never mutate it.
#[derive(Clone)]
pub struct GatewayState {
    pub runtime: Arc<RuntimeOptions>,
    pub credentials: Arc<CredentialSourceConfig>,
    pub client_secret: Arc<ClientSecret>,
    pub tools: Arc<ToolRegistry>,
}

fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/tools", get(tools_handler))
        .route("/oauth2callback", get(oauth_callback_handler))
        .with_state(state)
}

/// GET /api/health — status, version, and the active credential mode.
/// Mode name only; never secret material.
async fn health_handler(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "credential_mode": state.credentials.source.mode_name(),
    }))
}

/// Resolve the caller's identity for a request.
///
/// With `email_in_header` on, a missing `x-user-email` header is a hard 400 —
/// the original contract is that the header is required, not best-effort.
/// With it off, identity comes from token introspection elsewhere and this
/// returns `None`.
fn user_email(
    headers: &HeaderMap,
    runtime: &RuntimeOptions,
) -> Result<Option<String>, StatusCode> {
    if !runtime.email_in_header {
        return Ok(None);
    }
    match headers.get(USER_EMAIL_HEADER).map(|v| v.to_str()) {
        Some(Ok(email)) if !email.is_empty() => Ok(Some(email.to_string())),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

/// GET /api/tools — enabled tool ids and their scopes.
async fn tools_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match user_email(&headers, &state.runtime) {
        Ok(user) => user,
        Err(status) => {
            warn!("tools request rejected: {} header required but missing", USER_EMAIL_HEADER);
            return (
                status,
                Json(serde_json::json!({
                    "error": format!("header {} is required", USER_EMAIL_HEADER)
                })),
            );
        }
    };

    let tools: Vec<_> = state
        .tools
        .enabled()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "scopes": t.scopes,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "tools": tools,
            "required_scopes": state.tools.required_scopes(),
            "user": user,
        })),
    )
}

/// GET /oauth2callback — acknowledge the OAuth redirect.
///
/// The exchange itself lives with the authentication collaborator; this
/// endpoint exists so the redirect target constructed from
/// `OAUTH_CALLBACK_BASE_URI` always lands somewhere that answers. In
/// placeholder mode there is nothing to exchange against, so answer 503
/// instead of letting the operator believe authentication is progressing.
async fn oauth_callback_handler(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if state.client_secret.is_placeholder() {
        warn!("OAuth redirect received while running with placeholder credentials");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "no real credentials configured; supply a credential source and restart",
        );
    }

    debug!(
        "OAuth redirect received (code present: {})",
        params.contains_key("code")
    );
    (
        StatusCode::OK,
        "authorization response received; you may close this window",
    )
}

/// Bind and serve. Runs until the process is terminated.
pub async fn start(state: GatewayState) -> Result<()> {
    let addr = format!("0.0.0.0:{}", state.runtime.port);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("workspace MCP gateway listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
