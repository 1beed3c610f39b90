// Rollcall API server
// Decision: In-memory store when DATABASE_URL is unset, so the server runs with no setup

use anyhow::{Context, Result};
use rollcall_core::telemetry::{init_telemetry, TelemetryConfig};
use rollcall_server::app::build_app;
use rollcall_server::config::ServerConfig;
use rollcall_server::storage::open_store;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Configure via environment variables:
    // - SERVICE_NAME: Service name (default: "rollcall-server")
    // - RUST_LOG / LOG_LEVEL: Log filter (default: "rollcall_server=debug,tower_http=debug,info")
    // - LOG_FORMAT: "json" for JSON lines
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "rollcall" {
        telemetry_config.service_name = "rollcall-server".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("rollcall_server=debug,tower_http=debug,info".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(&telemetry_config);

    tracing::info!("rollcall-server starting...");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        max_write_attempts = config.max_write_attempts,
        "Configuration loaded"
    );

    let store = open_store(&config).await?;
    let app = build_app(store, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("rollcall-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
