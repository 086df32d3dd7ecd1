use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use crate::auth::client::Identity;
use crate::state::AppState;

/// Greeting endpoint; only reachable through the session gate, which puts the
/// verified identity into the request extensions.
async fn hello(Extension(identity): Extension<Identity>) -> impl IntoResponse {
    tracing::debug!(user_id = %identity.user_id, "greeting authenticated user");
    Json(json!({ "message": "Hello world!" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/hello", get(hello))
}
