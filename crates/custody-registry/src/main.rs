//! Custody Registry Server Binary
//!
//! Runs the HTTP host adapter in front of a custody registry.

use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use custody_registry::{
    create_router, AppState, CustodyRegistry, MemoryStore, RegistryStore, ServerConfig,
};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Invalid custody registry configuration");

    // Initialize logging
    let log_level = config.log_level.parse().unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let store = open_store(&config).await;
    let registry = CustodyRegistry::new(config.registry.clone(), store);

    info!(
        administrator = %config.registry.administrator,
        name = ?config.registry.name,
        port = config.port,
        "Starting custody registry server"
    );

    let state = Arc::new(AppState::new(registry));
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "Custody registry listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(feature = "postgres")]
async fn open_store(config: &ServerConfig) -> Arc<dyn RegistryStore> {
    match config.database_url {
        Some(ref url) => Arc::new(
            custody_registry::PostgresStore::new(url)
                .await
                .expect("Failed to connect to PostgreSQL"),
        ),
        None => Arc::new(MemoryStore::new()),
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &ServerConfig) -> Arc<dyn RegistryStore> {
    if config.database_url.is_some() {
        tracing::warn!("Database URL ignored: built without the postgres feature");
    }
    Arc::new(MemoryStore::new())
}
