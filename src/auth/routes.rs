use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Delegated request bodies are tiny (credentials, tokens); cap them anyway.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Routes mounted at `/api/auth`: sign-in/up, session refresh and social
/// login callbacks are handled entirely by the auth provider. Everything
/// under this prefix is forwarded verbatim and is exempt from the auth gate.
pub fn router() -> Router<AppState> {
    Router::new().fallback(forward)
}

async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", axum::http::uri::PathAndQuery::as_str);

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| {
            AppError::PayloadTooLarge("Request body exceeds the delegation size limit.".to_string())
        })?;
    let upstream = state
        .gateway
        .forward(parts.method, path_and_query, &parts.headers, bytes)
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    let mut builder = Response::builder().status(upstream.status());
    for (name, value) in upstream.headers() {
        // Hop-by-hop headers are not relayed; axum recomputes content-length.
        if name == header::TRANSFER_ENCODING
            || name == header::CONNECTION
            || name == header::CONTENT_LENGTH
        {
            continue;
        }
        builder = builder.header(name, value);
    }

    let body = upstream
        .bytes()
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;
    Ok(builder.body(Body::from(body))?)
}
