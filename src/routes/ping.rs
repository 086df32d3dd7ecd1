use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Liveness probe. Always answers, never touches auth or storage.
async fn ping() -> impl IntoResponse {
    Json(json!({ "message": "pong" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
