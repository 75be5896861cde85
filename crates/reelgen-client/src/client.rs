//! Reelgen HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use reelgen_core::{GenerationJob, JobId, UserId};

use crate::error::ClientError;
use crate::types::{AcceptedJob, ApiErrorResponse, GenerateRequest, JobList, ProfileUpdate, UsageToday};

/// Reelgen API client.
///
/// User-facing calls take the signed-in user's JWT per request; the admin
/// profile call takes the billing system's API key instead.
#[derive(Debug, Clone)]
pub struct ReelgenClient {
    client: Client,
    base_url: String,
}

impl ReelgenClient {
    /// Create a new reelgen client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the reelgen service (e.g., `"http://reelgen:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new reelgen client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Submit a text-to-video generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_video(
        &self,
        user_jwt: &str,
        request: GenerateRequest,
    ) -> Result<AcceptedJob, ClientError> {
        self.generate("video", user_jwt, request).await
    }

    /// Submit a text-to-audio generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_audio(
        &self,
        user_jwt: &str,
        request: GenerateRequest,
    ) -> Result<AcceptedJob, ClientError> {
        self.generate("audio", user_jwt, request).await
    }

    async fn generate(
        &self,
        kind: &str,
        user_jwt: &str,
        request: GenerateRequest,
    ) -> Result<AcceptedJob, ClientError> {
        let url = format!("{}/v1/generate/{kind}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch one of the caller's jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_job(
        &self,
        user_jwt: &str,
        job_id: &JobId,
    ) -> Result<GenerationJob, ClientError> {
        let url = format!("{}/v1/jobs/{job_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the caller's jobs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_jobs(
        &self,
        user_jwt: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<JobList, ClientError> {
        let url = format!("{}/v1/jobs", self.base_url);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Re-poll the provider for a queued job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn refresh_job(
        &self,
        user_jwt: &str,
        job_id: &JobId,
    ) -> Result<GenerationJob, ClientError> {
        let url = format!("{}/v1/jobs/{job_id}/refresh", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the caller's usage counters for today.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn today_usage(&self, user_jwt: &str) -> Result<UsageToday, ClientError> {
        let url = format!("{}/v1/usage/today", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Upsert a user's subscription profile (billing system only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn upsert_profile(
        &self,
        admin_key: &str,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), ClientError> {
        let url = format!("{}/v1/admin/profiles/{user_id}", self.base_url);

        let response = self
            .client
            .put(&url)
            .header("x-admin-key", admin_key)
            .json(&update)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(self.error_from(response).await)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        Err(self.error_from(response).await)
    }

    /// Convert an error response into a typed [`ClientError`].
    async fn error_from(&self, response: reqwest::Response) -> ClientError {
        let status = response.status();
        tracing::debug!(status = %status, "Request to reelgen failed");
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message.clone();

                // Map specific error codes to typed errors
                match code {
                    "quota_exceeded" => {
                        let field = |name: &str| {
                            api_error
                                .error
                                .details
                                .as_ref()
                                .and_then(|d| d.get(name))
                                .and_then(serde_json::Value::as_u64)
                                .and_then(|v| u32::try_from(v).ok())
                                .unwrap_or(0)
                        };

                        ClientError::QuotaExceeded {
                            limit: field("limit"),
                            used: field("used"),
                        }
                    }
                    "generation_failed" => ClientError::GenerationFailed { message },
                    "not_found" if message.contains("job") => {
                        ClientError::JobNotFound { message }
                    }
                    _ => ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    },
                }
            }
            Err(_) => ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            },
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
