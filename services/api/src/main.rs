//! Munch API
//!
//! Entry point: wires configuration, the store backend, and the HTTP server
//! together. The route surface lives in [`munch_api::router`].

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use munch_api::config::Config;
use munch_api::router::build_router;
use munch_api::state::AppState;
use munch_db::Repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("munch_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Munch API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Pick the store backend
    let (repos, pool) = match config.database_url.as_deref() {
        Some(url) => {
            let pool = munch_db::create_pool(url).await?;
            munch_db::run_migrations(&pool).await?;
            tracing::info!("Database pool created");
            (Repositories::postgres(pool.clone()), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            (Repositories::in_memory(), None)
        }
    };

    // Create application state and router
    let http_port = config.http_port;
    let state = AppState::new(repos, pool, config);
    let app = build_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
