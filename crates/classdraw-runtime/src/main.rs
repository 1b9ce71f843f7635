//! # ClassDraw
//!
//! Classroom number draw service.
//!
//! ## Startup Sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from `CD_*` environment variables
//! 3. Warn if the configuration is not production ready
//! 4. Wire the document store, draw engine and reset operation
//! 5. Serve HTTP until Ctrl+C, then drain in-flight requests

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use classdraw_runtime::{NodeConfig, ServiceContainer};

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    if let Err(e) = config.validate_for_production() {
        warn!("{}", e);
    }

    info!("===========================================");
    info!("  ClassDraw v{}", cd_03_api_gateway::VERSION);
    info!("===========================================");
    info!(
        port = config.gateway.http.port,
        backend = %config.store.backend,
        max_attempts = config.lottery.retry.max_attempts,
        "Configuration loaded"
    );

    let container = ServiceContainer::new(config).context("Failed to wire services")?;
    let gateway = container.gateway().context("Failed to build HTTP gateway")?;

    info!("Service is running. Press Ctrl+C to stop.");
    gateway
        .serve(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}
