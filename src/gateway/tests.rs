use super::*;

use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;
use url::Url;

use crate::config::CredentialSource;

fn make_state(runtime: RuntimeOptions, secret: ClientSecret) -> GatewayState {
    let credentials = CredentialSourceConfig {
        source: CredentialSource::PlaceholderLazy,
        callback_base_uri: Url::parse("https://mcp.example.com").unwrap(),
    };
    GatewayState {
        tools: Arc::new(ToolRegistry::from_options(&runtime)),
        runtime: Arc::new(runtime),
        credentials: Arc::new(credentials),
        client_secret: Arc::new(secret),
    }
}

fn real_secret() -> ClientSecret {
    ClientSecret::from_json(r#"{"client_id": "id-123", "client_secret": "s3cret"}"#).unwrap()
}

#[tokio::test]
async fn test_health_reports_credential_mode() {
    let app = build_router(make_state(RuntimeOptions::default(), real_secret()));

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], crate::VERSION);
    assert_eq!(json["credential_mode"], "placeholder");
}

#[tokio::test]
async fn test_tools_lists_enabled_tools() {
    let runtime = RuntimeOptions {
        enabled_tools: vec!["gmail".to_string(), "calendar".to_string()],
        ..RuntimeOptions::default()
    };
    let app = build_router(make_state(runtime, real_secret()));

    let req = Request::builder()
        .method("GET")
        .uri("/api/tools")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 65536).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["tools"].as_array().unwrap().len(), 2);
    assert_eq!(json["tools"][0]["id"], "gmail");
    assert!(json["user"].is_null());
}

#[tokio::test]
async fn test_tools_requires_email_header_when_enabled() {
    let runtime = RuntimeOptions {
        email_in_header: true,
        ..RuntimeOptions::default()
    };
    let app = build_router(make_state(runtime, real_secret()));

    let req = Request::builder()
        .method("GET")
        .uri("/api/tools")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tools_accepts_email_header() {
    let runtime = RuntimeOptions {
        email_in_header: true,
        ..RuntimeOptions::default()
    };
    let app = build_router(make_state(runtime, real_secret()));

    let req = Request::builder()
        .method("GET")
        .uri("/api/tools")
        .header(USER_EMAIL_HEADER, "user@example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 65536).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["user"], "user@example.com");
}

#[tokio::test]
async fn test_oauth_callback_rejects_placeholder_credentials() {
    let app = build_router(make_state(
        RuntimeOptions::default(),
        ClientSecret::placeholder(),
    ));

    let req = Request::builder()
        .method("GET")
        .uri("/oauth2callback?code=4/abc&state=xyz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_oauth_callback_acknowledges_with_real_credentials() {
    let app = build_router(make_state(RuntimeOptions::default(), real_secret()));

    let req = Request::builder()
        .method("GET")
        .uri("/oauth2callback?code=4/abc")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[test]
fn test_user_email_disabled_returns_none() {
    let headers = HeaderMap::new();
    assert_eq!(user_email(&headers, &RuntimeOptions::default()), Ok(None));
}

#[test]
fn test_user_email_empty_header_rejected() {
    let runtime = RuntimeOptions {
        email_in_header: true,
        ..RuntimeOptions::default()
    };
    let mut headers = HeaderMap::new();
    headers.insert(USER_EMAIL_HEADER, "".parse().unwrap());
    assert_eq!(user_email(&headers, &runtime), Err(StatusCode::BAD_REQUEST));
}
