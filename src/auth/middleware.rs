use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Auth gate applied to the `/api` subtree (the liveness probe is exempt).
///
/// Extracts the session token from the request, delegates validation to the
/// configured [`SessionVerifier`](crate::auth::client::SessionVerifier), and
/// short-circuits with `401` on any failure. On success the verified
/// [`Identity`](crate::auth::client::Identity) is inserted into the request
/// extensions before the downstream handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing session token.".to_string()))?;

    let identity = state.verifier.verify(&token).await.map_err(|e| {
        tracing::debug!(error = %e, "session verification failed");
        AppError::Unauthorized("Invalid or expired session.".to_string())
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Locate the session token: `Authorization: Bearer <token>` first, then the
/// provider's `sAccessToken` cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|pair| pair.strip_prefix("sAccessToken="))
        })
        .map(ToString::to_string)
}
