// HRMS Lite - Web Server
// REST API with Axum over the SQLite store

use anyhow::{Context, Result};
use hrms_lite::api::{build_router, AppState};
use hrms_lite::{setup_database, AppConfig, SystemClock};
use rusqlite::Connection;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    setup_database(&conn)?;

    info!(
        rate_limit = config.enable_rate_limit,
        cache = config.enable_cache,
        "Database ready at {}",
        config.database_path.display()
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(conn, config, Arc::new(SystemClock));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("🚀 HRMS API listening on http://{}", bind_addr);
    info!("📊 Endpoints: /employees, /attendance, /api/v2/...");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server error")?;

    Ok(())
}
