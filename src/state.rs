use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::client::{AuthClient, SessionVerifier};
use crate::config::Config;

/// Shared application state available to all request handlers via Axum's `State` extractor.
///
/// Built once at startup and immutable afterwards; every field is cheap to
/// clone (connection pools and `Arc`s).
#[derive(Clone)]
pub struct AppState {
    /// On-disk store handle. Opened at startup, closed at shutdown; no
    /// handler queries it in the current scope.
    pub db: DatabaseConnection,
    pub config: Config,
    /// Session validation seam; a stub implementation is injected in tests.
    pub verifier: Arc<dyn SessionVerifier>,
    /// Concrete client for the auth provider core, used by the delegation
    /// routes under `/api/auth`.
    pub gateway: Arc<AuthClient>,
}
