//! Server: reads settings from the environment (and `.env`), connects to
//! PostgreSQL, ensures tables exist and serves the watchlist routes.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use watchlist::{app, AppState, PgStore, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchlist=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = PgStore::connect(&settings).await?;
    let state = AppState::new(Arc::new(store), &settings)?;
    let router = app(state, settings.body_limit_bytes);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(status_codes = ?settings.status_codes, "listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
