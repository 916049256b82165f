//! Library Lending Server - catalog and loan tracking over HTTP.

use lending_engine::{BookStore, Library, MemoryStore};
use lending_server::config::{Config, StorageBackend};
use lending_server::db::{self, PgStore};
use lending_server::error::AppError;
use lending_server::{app, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lending_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting Library Server on {}", config.bind_addr());
    let listener = TcpListener::bind(config.bind_addr()).await?;

    let storage = config.storage;
    match storage {
        StorageBackend::Postgres => {
            // Create database pool
            let pool = db::create_pool(&config.database_url, config.max_connections).await?;

            // Run migrations
            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            serve(listener, PgStore::new(pool), config).await?;
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, books are lost on shutdown");
            serve(listener, MemoryStore::new(), config).await?;
        }
    }

    Ok(())
}

async fn serve<S>(listener: TcpListener, store: S, config: Config) -> std::io::Result<()>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let state = AppState::new(Library::new(store), config);

    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
