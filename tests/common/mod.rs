#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use greeter_api::auth::client::{AuthClient, AuthError, Identity, SessionVerifier};
use greeter_api::config::{Config, LogLevel, Mode};
use greeter_api::state::AppState;
use greeter_api::{db, server};

pub const VALID_TOKEN: &str = "valid-session-token";
pub const TEST_ORIGIN: &str = "http://localhost:5173";

pub fn test_config() -> Config {
    Config {
        api_domain: "http://localhost:8080".to_string(),
        website_domain: TEST_ORIGIN.to_string(),
        auth_connection_uri: "http://localhost:3567".to_string(),
        auth_api_key: "test-key".to_string(),
        app_name: "Test Server".to_string(),
        port: 0,
        mode: Mode::Development,
        log_level: LogLevel::Info,
        auth_debug: false,
        db_file_path: ":memory:".to_string(),
    }
}

/// Verifier accepting exactly [`VALID_TOKEN`], standing in for the provider.
pub struct StubVerifier;

#[async_trait::async_trait]
impl SessionVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token == VALID_TOKEN {
            Ok(Identity {
                user_id: "user-123".to_string(),
                session_handle: "handle-123".to_string(),
            })
        } else {
            Err(AuthError::Rejected("UNAUTHORISED".to_string()))
        }
    }
}

/// Verifier simulating an unreachable provider.
pub struct UnreachableVerifier;

#[async_trait::async_trait]
impl SessionVerifier for UnreachableVerifier {
    async fn verify(&self, _token: &str) -> Result<Identity, AuthError> {
        Err(AuthError::Provider("connection refused".to_string()))
    }
}

/// Verifier that holds every request for the given duration before answering
/// like [`StubVerifier`]; keeps requests in flight for drain tests.
pub struct SlowVerifier(pub std::time::Duration);

#[async_trait::async_trait]
impl SessionVerifier for SlowVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.0).await;
        StubVerifier.verify(token).await
    }
}

/// Build application state with an in-memory store.
pub async fn state_with(config: Config, verifier: Arc<dyn SessionVerifier>) -> AppState {
    let db = db::connect(&config.db_file_path).await.unwrap();
    let gateway = Arc::new(AuthClient::new(&config).unwrap());
    AppState {
        db,
        config,
        verifier,
        gateway,
    }
}

pub async fn test_state(verifier: Arc<dyn SessionVerifier>) -> AppState {
    state_with(test_config(), verifier).await
}

/// Build the full application with the stub verifier and an in-memory store.
pub async fn app() -> Router {
    app_with_verifier(Arc::new(StubVerifier)).await
}

pub async fn app_with_verifier(verifier: Arc<dyn SessionVerifier>) -> Router {
    server::build_app(test_state(verifier).await).unwrap()
}

/// Send a request with the given method, uri and headers; return
/// (status, response headers, body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let response_headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    (status, response_headers, body_str)
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = send(app, "GET", uri, &[]).await;
    (status, body)
}
