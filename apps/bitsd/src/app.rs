//! Application orchestrator: wires the store and router to the listener.

use bitsd_server::{AppState, bits_router};
use bitsd_store::SessionStore;

use crate::config::Config;

/// Runs the server until shutdown is requested.
///
/// Startup failures (storage directory creation, listener bind) are
/// process-fatal; everything after that is per-request error handling.
pub async fn run(config: Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.storage_dir)?;

    let store = SessionStore::new(&config.storage_dir);
    let state = AppState::new(store);
    let router = bits_router(&config.route, state);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        route = %config.route,
        storage = %config.storage_dir,
        "BITS server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("SIGINT received, shutting down");
}
