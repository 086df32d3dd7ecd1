//! Delegation routes: error surface when the provider is unreachable and
//! when a delegated body exceeds the size cap.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use greeter_api::config::Config;
use greeter_api::server;

/// App whose provider address fails to connect immediately.
async fn proxy_app() -> Router {
    let config = Config {
        auth_connection_uri: "http://127.0.0.1:1".to_string(),
        ..common::test_config()
    };
    let state = common::state_with(config, Arc::new(common::StubVerifier)).await;
    server::build_app(state).unwrap()
}

async fn post(app: &Router, uri: &str, body: Vec<u8>) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn oversized_delegated_body_is_rejected_with_413() {
    let app = proxy_app().await;
    let (status, body) = post(&app, "/api/auth/signin", vec![b'x'; 65 * 1024]).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn unreachable_provider_returns_generic_bad_gateway() {
    let app = proxy_app().await;
    let (status, body) = post(&app, "/api/auth/signin", br#"{"email":"a@b.c"}"#.to_vec()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "BAD_GATEWAY");
    assert_eq!(
        json["error"]["message"],
        "The authentication service is unavailable."
    );
    // Transport detail stays in the logs, not on the wire.
    assert!(!body.contains("127.0.0.1"));
}
