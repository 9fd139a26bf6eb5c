//! Bind, serve, and shut down cleanly.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::configuration::config::ServerConfig;
use crate::server::router::{build_router, AppState};
use crate::simulation::runner::SimulationRunner;

/// Serve viewers until Ctrl-C, then stop the simulation
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let runner = Arc::clone(&state.runner);
    let app = build_router(state, &config.path);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, path = %config.path, "listening for viewers");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(runner))
        .await
}

async fn shutdown_signal(runner: Arc<SimulationRunner>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
    if tokio::task::spawn_blocking(move || runner.stop()).await.is_err() {
        error!("failed to stop simulation during shutdown");
    }
}
