//! Application state.

use std::sync::Arc;

use reelgen_store::{RocksStore, SharedStore};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::provider::{HttpProviderGateway, ProviderGateway};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lazily-initialized storage handle; a failed open is retried on the
    /// next request rather than cached.
    pub store: SharedStore,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Generation provider gateway (optional).
    pub provider: Option<Arc<dyn ProviderGateway>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: SharedStore, config: ServiceConfig) -> Self {
        // Create the provider gateway if configured
        let provider = config
            .provider_api_url
            .as_ref()
            .zip(config.provider_api_key.as_ref())
            .map(|(url, key)| {
                tracing::info!(provider_url = %url, "Generation provider configured");
                Arc::new(HttpProviderGateway::new(url, key)) as Arc<dyn ProviderGateway>
            });

        if provider.is_none() {
            tracing::warn!("Generation provider not configured - submissions will be rejected");
        }

        Self {
            store,
            config,
            provider,
        }
    }

    /// Get the store, opening it on first use.
    pub fn store(&self) -> Result<Arc<RocksStore>, ApiError> {
        Ok(self.store.get_or_open()?)
    }

    /// Get the provider gateway, or fail with a service error.
    pub fn provider(&self) -> Result<Arc<dyn ProviderGateway>, ApiError> {
        self.provider
            .clone()
            .ok_or_else(|| ApiError::ExternalService("generation provider not configured".into()))
    }
}
