//! D-Day server - HTTP backend for D-Day countdown records

use anyhow::Context;
use clap::Parser;
use dday_core::{init_tracing, DDayConfig, DDayDatabase};
use dday_server::{build_router, AppState, Cli};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(DDayConfig::from_env());
    init_tracing(&cli.observability(&config.server))?;
    config.validate()?;

    let db = DDayDatabase::from_connection_string_with_config(
        &config.database.url,
        config.database.pool.clone(),
    )
    .await?;
    db.ensure_schema().await?;

    let health = db.get_pool_health().await;
    info!(
        healthy = health.is_healthy,
        pool_size = health.pool_size,
        max_connections = health.max_connections,
        "Database ready"
    );

    let app = build_router(AppState::new(db));

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        environment = %config.server.environment,
        "Server starting on port {}", config.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
