use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use tokio::signal;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::auth;
use crate::routes;
use crate::state::AppState;

/// Time budget for in-flight requests once a termination signal arrives.
pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Assemble the full application: routes, auth gate, CORS and request tracing.
///
/// # Errors
///
/// Returns an error if the configured website domain is not a valid origin.
pub fn build_app(state: AppState) -> anyhow::Result<Router> {
    let origin = state
        .config
        .website_domain
        .parse::<HeaderValue>()
        .context("WEBSITE_DOMAIN is not a valid origin")?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers(auth::cors_allow_headers())
        .allow_credentials(true);

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status_code = tracing::field::Empty,
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            tracing::info!(latency_ms = latency.as_millis(), "response");
        });

    Ok(routes::router(&state)
        .with_state(state)
        .layer(cors)
        .layer(trace))
}

/// Run the HTTP service until a termination signal, then drain.
///
/// # Errors
///
/// Returns an error if the listener cannot bind, if the server fails while
/// serving, or if draining exceeds the grace period. All are fatal; the
/// caller converts them into a non-zero exit.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    run_with_shutdown(state, listener, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves, then drain.
///
/// The accept loop runs on a background task while this function blocks on
/// `shutdown`. Once it resolves no new connections are accepted; in-flight
/// requests get [`GRACE_PERIOD`] to finish before the shutdown is forced.
/// Split out from [`run`] so tests can bind an ephemeral port and trigger
/// the drain without sending process signals.
///
/// # Errors
///
/// Returns an error if the server fails while serving or draining exceeds
/// the grace period.
pub async fn run_with_shutdown(
    state: AppState,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let app = build_app(state)?;

    let addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    tracing::info!(%addr, "server listening");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut serve_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut serve_task => {
            // The accept loop never returns on its own unless something broke.
            return match result {
                Ok(Ok(())) => Err(anyhow::anyhow!("server stopped unexpectedly")),
                Ok(Err(e)) => Err(anyhow::Error::from(e).context("server error")),
                Err(e) => Err(anyhow::Error::from(e).context("server task panicked")),
            };
        }
        () = shutdown => {}
    }

    tracing::info!("shutting down gracefully, draining in-flight requests");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(GRACE_PERIOD, serve_task).await {
        Ok(Ok(Ok(()))) => {
            tracing::info!("server exiting");
            Ok(())
        }
        Ok(Ok(Err(e))) => Err(anyhow::Error::from(e).context("server error during drain")),
        Ok(Err(e)) => Err(anyhow::Error::from(e).context("server task panicked during drain")),
        Err(_) => Err(anyhow::anyhow!(
            "server forced to shutdown: requests still in flight after {GRACE_PERIOD:?}"
        )),
    }
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .map_err(|e| tracing::error!("Failed to install Ctrl+C handler: {e}"))
            .ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to install signal handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
