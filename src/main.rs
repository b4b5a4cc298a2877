use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_registry::common::AppState;
use sensor_registry::config::{Config, StoreBackend};
use sensor_registry::routes;
use sensor_registry::services::SensorService;
use sensor_registry::store::{MongoMetadataStore, RedisReadingCache, SeaOrmIdentityStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sensor_registry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting sensor-registry...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        store_backend = ?config.store_backend,
        host = %config.api_host,
        port = config.api_port,
        "Configuration loaded"
    );

    let state = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores, data is lost on shutdown");
            AppState::in_memory(config.clone())
        }
        StoreBackend::External => {
            let sensors = connect_stores(&config).await?;
            AppState::new(config.clone(), sensors)
        }
    };

    let app = routes::build_router(state);

    // Start server with graceful shutdown
    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Connect to Postgres, MongoDB and Redis (fail-fast) and wire the adapters.
async fn connect_stores(config: &Config) -> Result<SensorService, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Migrations completed");

    tracing::info!("Connecting to MongoDB...");
    let mongo = mongodb::Client::with_uri_str(&config.mongodb_url).await?;
    let metadata = MongoMetadataStore::new(&mongo.database(&config.mongodb_database));
    metadata.ensure_indexes().await?;
    tracing::info!(database = %config.mongodb_database, "MongoDB connection established");

    tracing::info!("Connecting to Redis...");
    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;
    tracing::info!("Redis connection established");

    Ok(SensorService::new(
        Arc::new(SeaOrmIdentityStore::new(db)),
        Arc::new(metadata),
        Arc::new(RedisReadingCache::new(redis_conn)),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
