mod config;
mod db;
mod errors;
mod models;
mod readings;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LISTEN_PORT};
use crate::db::bootstrap;
use crate::readings::store::MySqlReadingStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sensor API v{}", env!("CARGO_PKG_VERSION"));
    info!("Database config: {:?}", config.db);

    // A store that cannot be prepared will not heal on its own: exit before serving.
    let pool = match bootstrap(&config.db).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database bootstrap failed: {e:#}");
            return Err(e.context("database bootstrap failed"));
        }
    };

    let state = AppState {
        store: Arc::new(MySqlReadingStore::new(pool)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
