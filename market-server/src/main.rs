//! market-server - marketplace checkout and settlement backend
//!
//! Long-running service that:
//! - Turns carts into durable orders (stock reservation + shipping snapshot)
//! - Collects payment via COD, stored wallet balance, or the VNPay gateway
//! - Verifies gateway callbacks and splits proceeds among sellers

use market_server::api;
use market_server::core::{AppState, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting market-server (env: {})", config.environment);

    // Initialize application state (opens DB, applies migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("market-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
