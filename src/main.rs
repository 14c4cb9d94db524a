mod config;
mod demo;
mod game;
mod leaderboard;
mod metrics;
mod net;
mod util;

use std::sync::Arc;

use tracing::{info, Level};

use crate::config::ServerConfig;
use crate::leaderboard::service::LeaderboardService;
use crate::leaderboard::store::MemoryStore;
use crate::metrics::Metrics;
use crate::net::api::{build_router, ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Pragma Survival Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = ServerConfig::load_or_default();
    if let Err(reason) = config.validate() {
        anyhow::bail!("invalid configuration: {reason}");
    }
    info!(
        "Configuration loaded: {}:{}, demo_runs={}",
        config.bind_address, config.port, config.demo_runs
    );

    // Shared state: in-memory store, merge service, metrics
    let store = MemoryStore::shared();
    let leaderboard = Arc::new(LeaderboardService::new(store));
    let metrics = Arc::new(Metrics::new());

    // Optional headless autoplay, seeds the board before serving
    if config.demo_runs > 0 {
        info!("Running {} demo run(s)", config.demo_runs);
        demo::run_demo(&leaderboard, config.demo_runs)?;
    }

    let app = build_router(ApiState {
        leaderboard,
        metrics,
    });

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server ready on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
