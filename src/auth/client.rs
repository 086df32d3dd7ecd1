use std::fmt;
use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, Method};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

/// Verified session identity, attached to the request extensions by the auth
/// gate for the duration of one request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub session_handle: String,
}

/// Failure modes of session validation. Both map to a rejected request; the
/// distinction only matters for logging.
#[derive(Debug)]
pub enum AuthError {
    /// The provider evaluated the token and rejected it.
    Rejected(String),
    /// The provider was unreachable or returned something unintelligible.
    /// Treated as an authorization failure for that request only; no retry.
    Provider(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(status) => write!(f, "session rejected by provider: {status}"),
            Self::Provider(msg) => write!(f, "auth provider error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Narrow seam over session validation so the concrete provider is swappable
/// and mockable in tests.
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Client for the externally hosted auth provider core.
///
/// Configured once at startup; construction failure is fatal. Holds a single
/// `reqwest::Client` (itself an `Arc` around a pool) shared by the verify
/// path and the `/api/auth` delegation routes.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    debug: bool,
}

/// Request headers relayed to the provider core on delegated calls:
/// content negotiation, session transport, and the provider SDK's own set.
const FORWARDED_HEADERS: [HeaderName; 7] = [
    axum::http::header::CONTENT_TYPE,
    axum::http::header::COOKIE,
    axum::http::header::AUTHORIZATION,
    HeaderName::from_static("rid"),
    HeaderName::from_static("fdi-version"),
    HeaderName::from_static("anti-csrf"),
    HeaderName::from_static("st-auth-mode"),
];

#[derive(Deserialize)]
struct VerifyResponse {
    status: String,
    session: Option<SessionInfo>,
}

#[derive(Deserialize)]
struct SessionInfo {
    handle: String,
    #[serde(rename = "userId")]
    user_id: String,
}

impl AuthClient {
    /// Build the client from configuration, validating the connection URI.
    ///
    /// # Errors
    ///
    /// Returns an error if `AUTH_CONNECTION_URI` is not a valid URL or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        reqwest::Url::parse(&config.auth_connection_uri)
            .context("AUTH_CONNECTION_URI is not a valid URL")?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build auth provider HTTP client")?;

        Ok(Self {
            http,
            base_url: config.auth_connection_uri.trim_end_matches('/').to_string(),
            api_key: config.auth_api_key.clone(),
            debug: config.auth_debug,
        })
    }

    /// Forward a delegated auth request (sign-in/up, session refresh, social
    /// login callbacks) to the provider core, attaching the API key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Provider` if the provider cannot be reached.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<reqwest::Response, AuthError> {
        let url = format!("{}{path_and_query}", self.base_url);
        if self.debug {
            tracing::debug!(%method, %url, "forwarding request to auth provider");
        }

        let mut request = self
            .http
            .request(method, url)
            .header("api-key", &self.api_key)
            .body(body);
        for name in &FORWARDED_HEADERS {
            if let Some(value) = headers.get(name) {
                request = request.header(name, value);
            }
        }

        request
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SessionVerifier for AuthClient {
    /// Validate a session token against the provider core.
    ///
    /// Single-pass per request: no caching, no retry. Any transport or
    /// protocol failure counts as an authorization failure for this request.
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/recipe/session/verify", self.base_url);
        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(&json!({
                "accessToken": token,
                "doAntiCsrfCheck": false,
                "enableAntiCsrf": false,
                "checkDatabase": false,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Provider(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("malformed provider response: {e}")))?;

        match (body.status.as_str(), body.session) {
            ("OK", Some(session)) => Ok(Identity {
                user_id: session.user_id,
                session_handle: session.handle,
            }),
            ("OK", None) => Err(AuthError::Provider(
                "provider reported OK without session data".to_string(),
            )),
            (other, _) => {
                if self.debug {
                    tracing::debug!(status = other, "provider rejected session token");
                }
                Err(AuthError::Rejected(other.to_string()))
            }
        }
    }
}
