//! Common test utilities for reelgen integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelgen_core::UserId;
use reelgen_service::{create_router, AppState, ServiceConfig};
use reelgen_store::SharedStore;

/// Admin API key used across tests.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Webhook signing secret used across tests.
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// A mock generation provider.
    pub provider: MockServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and mock provider.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let provider = MockServer::start().await;

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_jwt_secret: "test-jwt-secret".into(),
            auth_audience: "reelgen".into(),
            admin_api_key: Some(ADMIN_KEY.into()),
            provider_api_url: Some(provider.uri()),
            provider_api_key: Some("test-provider-key".into()),
            provider_webhook_secret: Some(WEBHOOK_SECRET.into()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let store = SharedStore::new(temp_dir.path());
        store.get_or_open().expect("Failed to open store");

        let state = AppState::new(store, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            provider,
            _temp_dir: temp_dir,
            test_user_id,
        }
    }

    /// Get the authorization header for user authentication.
    pub fn user_auth_header(&self) -> String {
        format!("Bearer test-token:{}", self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> String {
        let other_user = UserId::generate();
        format!("Bearer test-token:{other_user}")
    }

    /// Mount a provider mock that accepts submissions as queued.
    pub async fn mock_provider_accepts(&self, provider_job_id: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "job_id": provider_job_id,
                "status": "queued",
                "media_url": null,
                "created_at": "2026-08-23T10:00:00Z"
            })))
            .mount(&self.provider)
            .await;
    }

    /// Mount a provider mock that fails every submission with a 500.
    pub async fn mock_provider_unavailable(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&self.provider)
            .await;
    }

    /// Upgrade the test user to the given plan via the admin endpoint.
    pub async fn set_plan(&self, plan: &str, expires_at: Option<&str>) {
        let response = self
            .server
            .put(&format!("/v1/admin/profiles/{}", self.test_user_id))
            .add_header("x-admin-key", ADMIN_KEY)
            .json(&serde_json::json!({
                "plan": plan,
                "plan_expires_at": expires_at,
            }))
            .await;
        response.assert_status_ok();
    }
}
