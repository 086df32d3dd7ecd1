mod hello;
mod ping;

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::auth;
use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /ping` — liveness probe, unauthenticated
/// - `/api/auth/*` — delegated to the auth provider, unauthenticated
/// - `GET /api/hello` — behind the session gate
pub fn router(state: &AppState) -> Router<AppState> {
    let gated = Router::new()
        .merge(hello::router())
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::middleware::require_session,
        ));

    let api = Router::new().nest("/auth", auth::routes::router()).merge(gated);

    Router::new().merge(ping::router()).nest("/api", api)
}
