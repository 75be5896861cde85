//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/reelgen").
    pub data_dir: String,

    /// HS256 secret for validating user JWTs.
    pub auth_jwt_secret: String,

    /// Expected JWT audience (default: "reelgen").
    pub auth_audience: String,

    /// Admin API key for profile writes from the billing system.
    pub admin_api_key: Option<String>,

    /// Generation provider API URL (optional; generation is disabled
    /// without it).
    pub provider_api_url: Option<String>,

    /// Generation provider API key (optional).
    pub provider_api_key: Option<String>,

    /// Shared secret for verifying provider webhook signatures (optional).
    pub provider_webhook_secret: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Provider secrets file structure.
#[derive(Debug, Deserialize)]
struct ProviderSecrets {
    api_url: String,
    api_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load provider secrets from file first, then fall back to env vars
        let (provider_api_url, provider_api_key, provider_webhook_secret) =
            load_provider_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/reelgen".into()),
            auth_jwt_secret: std::env::var("AUTH_JWT_SECRET").unwrap_or_default(),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "reelgen".into()),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            provider_api_url,
            provider_api_key,
            provider_webhook_secret,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}

/// Load provider secrets from file or environment.
fn load_provider_secrets() -> (Option<String>, Option<String>, Option<String>) {
    // Try multiple paths for the secrets file
    let secret_paths = [
        ".secrets/provider.json",
        "reelgen/.secrets/provider.json",
        "../.secrets/provider.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<ProviderSecrets>(path) {
            tracing::info!(path = %path, "Loaded provider secrets from file");
            return (
                Some(secrets.api_url),
                Some(secrets.api_key),
                secrets.webhook_secret,
            );
        }
    }

    // Fall back to environment variables
    tracing::debug!("Provider secrets file not found, using environment variables");
    (
        std::env::var("PROVIDER_API_URL").ok(),
        std::env::var("PROVIDER_API_KEY").ok(),
        std::env::var("PROVIDER_WEBHOOK_SECRET").ok(),
    )
}

/// Parse a JSON secrets file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
