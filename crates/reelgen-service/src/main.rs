//! Reelgen Service - HTTP API for quota-enforced media generation
//!
//! This is the main entry point for the reelgen service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelgen_service::{create_router, AppState, ServiceConfig};
use reelgen_store::SharedStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reelgen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reelgen Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        provider_configured = %config.provider_api_url.is_some(),
        webhook_secret_configured = %config.provider_webhook_secret.is_some(),
        "Service configuration loaded"
    );

    // Open the store eagerly so startup fails fast on a bad data dir
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = SharedStore::new(&config.data_dir);
    store.get_or_open()?;

    // Build app state
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
