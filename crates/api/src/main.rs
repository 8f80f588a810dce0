//! SmartCon - construction workforce management server

use std::sync::Arc;

use anyhow::Context;
use smartcon_api::utils::logging::init_tracing;
use smartcon_api::{router, AppContext};
use smartcon_domain::Config;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    let config = match smartcon_infra::config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "no configuration found, using defaults");
            Config::default()
        }
    };

    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);
    ctx.start().await.context("failed to start background services")?;

    let bind_addr = ctx.config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, db = %ctx.db.path().display(), "SmartCon listening");

    let app = router(Arc::clone(&ctx));
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if let Err(e) = ctx.shutdown().await {
        error!(error = %e, "shutdown did not complete cleanly");
    }
    info!("SmartCon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
}
