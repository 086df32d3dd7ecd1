use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use greeter_api::auth::client::{AuthClient, SessionVerifier};
use greeter_api::config::{Config, Mode};
use greeter_api::state::AppState;
use greeter_api::{db, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Startup order matters: config, logging, auth client, storage, server.
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        app_name = %config.app_name,
        mode = ?config.mode,
        "Starting greeter API"
    );

    let gateway = Arc::new(AuthClient::new(&config)?);

    let db = db::connect(&config.db_file_path).await?;

    let state = AppState {
        db: db.clone(),
        config,
        verifier: gateway.clone() as Arc<dyn SessionVerifier>,
        gateway,
    };

    let result = server::run(state).await;

    // Close the store after the server has drained, clean or forced.
    db::close(db).await;

    result
}

/// Initialize the `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured level; production mode emits JSON
/// lines, development keeps the human-readable format.
fn init_tracing(config: &Config) {
    let level = config.log_level.as_str();
    let auth_directive = if config.auth_debug {
        ",greeter_api::auth=debug"
    } else {
        ""
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("greeter_api={level},tower_http=info{auth_directive}").into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.mode == Mode::Production {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
