use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

/// Open the on-disk SQLite store.
///
/// The handle is process-wide and currently unqueried by any handler; it is
/// opened so the connection is proven healthy at startup and released cleanly
/// at shutdown. An open failure is fatal.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened or created.
pub async fn connect(db_file_path: &str) -> anyhow::Result<DatabaseConnection> {
    let url = if db_file_path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{db_file_path}?mode=rwc")
    };

    tracing::info!(db_file_path, "opening sqlite store");

    let mut opts = ConnectOptions::new(&url);
    opts.max_connections(5)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to open sqlite store at {db_file_path}"))?;
    Ok(db)
}

/// Close the store handle, logging rather than propagating failure; the
/// process is exiting either way.
pub async fn close(db: DatabaseConnection) {
    if let Err(e) = db.close().await {
        tracing::error!(error = %e, "error closing sqlite store");
    }
}
