use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use favorites_api::config::AppConfig;
use favorites_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use favorites_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("favorites_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!("Starting Favorites API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("API_SECRET must be set to verify bearer tokens");
    }

    let store: Arc<dyn Store> = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            DatabaseManager::ensure_schema(&pool)
                .await
                .context("failed to prepare database schema")?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            if config.is_production() {
                anyhow::bail!("DATABASE_URL is required in production");
            }
            warn!("DATABASE_URL not set, serving from an in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(store, config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Favorites API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
