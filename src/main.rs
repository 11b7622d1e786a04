//! Aegis Risk Oracle - Main Entry Point
//!
//! Serves `POST /analyze` and `GET /health` until Ctrl+C.

use aegis_risk_oracle::*;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    utils::setup_output_directories()?;
    let _logging_guard = utils::setup_logging()?;

    let config = Arc::new(CONFIG.clone());
    info!("🛡️  Aegis Risk Oracle v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = Arc::new(
        AuditOrchestrator::from_config(config.clone())
            .context("Failed to initialise audit orchestrator")?,
    );
    utils::print_config(&config, &orchestrator.signer_address());

    if config.signer_private_key == config::DEMO_SIGNER_KEY {
        warn!("⚠️  Signing with the public demo key, set ORACLE_SIGNER_KEY for anything real");
    }

    let app = api::router(api::AppState::new(orchestrator));
    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("👋 Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        // keep serving
        std::future::pending::<()>().await;
    }
    info!("🛑 Received Ctrl+C, shutting down...");
}
