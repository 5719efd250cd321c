// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::domains::listings::builtin_profiles;
use server_core::kernel::{DocumentStore, MemoryStore, MongoStore};
use server_core::server::build_app;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Realty Exchange API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect the document store
    let store: Arc<dyn DocumentStore> = match &config.mongodb_uri {
        Some(uri) => {
            let mongo = MongoStore::connect(uri, &config.mongodb_database)
                .await
                .context("Failed to connect to MongoDB")?;

            let collections: Vec<String> = builtin_profiles()
                .into_iter()
                .map(|profile| profile.collection)
                .collect();
            mongo
                .ensure_indexes(&collections)
                .await
                .context("Failed to create identifier indexes")?;

            Arc::new(mongo)
        }
        None => {
            tracing::warn!("MONGODB_URI not set; using in-memory store (data will not persist)");
            Arc::new(MemoryStore::new())
        }
    };

    // Build application
    let app = build_app(store, config.federation_timeout);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Catalog feed: http://localhost:{}/catalog", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
