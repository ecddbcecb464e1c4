//! market-server — Marketplace/catalog backend
//!
//! Long-running HTTP service that:
//! - Serves CRUD REST endpoints for categories, products, images,
//!   advertisements, messages and orders over PostgreSQL
//! - Authenticates users with JWT bearer tokens + rotating refresh tokens
//! - Auto-completes stale orders (lazy check + background sweep)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod hierarchy;
mod orders;
mod state;
mod util;
mod validation;

use tokio_util::sync::CancellationToken;

use config::Config;
use orders::sweeper::OrderSweeper;
use state::AppState;

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

    // Initialize application state (pool + migrations + JWT service)
    let state = AppState::new(&config).await?;

    // Background order-expiry sweeper, cancelled on shutdown
    let shutdown = CancellationToken::new();
    let sweeper = OrderSweeper::new(
        state.pool.clone(),
        config.order_sweep_interval_secs,
        shutdown.clone(),
    );
    tokio::spawn(sweeper.run());

    let app = api::create_router(state, &config);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("market-server HTTP listening on {addr}");

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_token.cancel();
        })
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown handler
///
/// Listens for SIGTERM and Ctrl+C signals
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
