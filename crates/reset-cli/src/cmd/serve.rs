use std::sync::Arc;

use anyhow::{Context, Result};
use reset_core::config::ResetConfig;
use reset_core::db::{wait_for_database, MySqlSeedDatabase, SeedDatabase};
use reset_core::executor::ResetExecutor;
use reset_core::watchdog;
use reset_server::AppState;
use tracing::{error, info, warn};

pub fn run(config: ResetConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve(config))
}

async fn serve(config: ResetConfig) -> Result<()> {
    info!(config = %config.describe(), "CTF database reset service starting");

    let db: Arc<dyn SeedDatabase> = Arc::new(MySqlSeedDatabase::new(&config.database));
    wait_for_database(db.as_ref(), config.startup)
        .await
        .context("cannot start service without database connection")?;

    let executor = Arc::new(ResetExecutor::new(db, config.seed_path.clone()));

    info!("performing initial database reset");
    if let Err(e) = executor.reset().await {
        error!(error = %e, "initial reset failed");
        warn!("service will continue, but database may not be in correct state");
    }

    // Runs until the process exits.
    let _watchdog = watchdog::spawn(Arc::clone(&executor), config.reset_interval());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.http_port))?;
    let state = AppState::new(executor, config);

    tokio::select! {
        res = reset_server::serve_on(state, listener) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
