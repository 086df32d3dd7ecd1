pub mod client;
pub mod middleware;
pub mod routes;

use axum::http::HeaderName;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};

/// Request headers the auth provider's frontend SDKs send on every call.
/// CORS must allow all of them or browser clients cannot authenticate.
pub const PROVIDER_CORS_HEADERS: [HeaderName; 5] = [
    HeaderName::from_static("rid"),
    HeaderName::from_static("fdi-version"),
    HeaderName::from_static("anti-csrf"),
    HeaderName::from_static("st-auth-mode"),
    AUTHORIZATION,
];

/// Full allow-list for the CORS layer: `content-type` plus the provider set.
#[must_use]
pub fn cors_allow_headers() -> Vec<HeaderName> {
    let mut headers = vec![CONTENT_TYPE];
    headers.extend(PROVIDER_CORS_HEADERS);
    headers
}
