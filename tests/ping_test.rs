//! Liveness probe behavior: always 200/pong, never gated.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn ping_returns_pong() {
    let app = common::app().await;
    let (status, body) = common::get(&app, "/ping").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["message"], "pong");
}

#[tokio::test]
async fn ping_ignores_auth_headers() {
    let app = common::app().await;

    // Garbage credentials must not affect the probe.
    let (status, _, body) = common::send(
        &app,
        "GET",
        "/ping",
        &[
            ("authorization", "Bearer not-a-real-token"),
            ("cookie", "sAccessToken=garbage"),
            ("x-unexpected", "value"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pong"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::app().await;
    let (status, _) = common::get(&app, "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
