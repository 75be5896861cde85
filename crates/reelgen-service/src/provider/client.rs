//! HTTP implementation of the provider gateway.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{ProviderErrorBody, RemoteJob, SubmitParams, SubmitRequest};
use super::{ProviderError, ProviderGateway};

/// Default timeout for provider calls.
///
/// Expiry is reported as `ProviderError::Unavailable`; callers wanting a
/// tighter budget impose their own.
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Generation provider API client.
#[derive(Debug, Clone)]
pub struct HttpProviderGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpProviderGateway {
    /// Create a new provider gateway.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider API URL (e.g., `"https://api.provider.example"`)
    /// * `api_key` - Provider API key
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Handle API response and convert errors to structured kinds.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<RemoteJob, ProviderError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<RemoteJob>()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    detail: e.to_string(),
                });
        }

        // Capture the error payload before classifying; it must not be
        // silently swallowed.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body).map_or_else(
            |_| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.clone()
                }
            },
            |parsed| match parsed.code {
                Some(code) => format!("{} ({code})", parsed.error),
                None => parsed.error,
            },
        );

        if status.is_server_error() {
            return Err(ProviderError::Unavailable {
                detail: format!("HTTP {}: {message}", status.as_u16()),
            });
        }

        Err(ProviderError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(e: &reqwest::Error) -> ProviderError {
        ProviderError::Unavailable {
            detail: if e.is_timeout() {
                format!("request timed out: {e}")
            } else {
                e.to_string()
            },
        }
    }
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn submit(
        &self,
        prompt: &str,
        params: &SubmitParams,
    ) -> Result<RemoteJob, ProviderError> {
        let url = format!("{}/v1/generations", self.base_url);
        let request = SubmitRequest {
            kind: params.kind.as_str(),
            prompt,
            model: &params.model,
            duration_seconds: params.duration_seconds,
            output_format: &params.output_format,
            reference: &params.reference,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        self.handle_response(response).await
    }

    async fn fetch_status(&self, provider_job_id: &str) -> Result<RemoteJob, ProviderError> {
        let url = format!("{}/v1/generations/{provider_job_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RemoteStatus;
    use reelgen_core::MediaKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params() -> SubmitParams {
        SubmitParams {
            kind: MediaKind::Video,
            model: "tavus-v2".into(),
            duration_seconds: 10,
            output_format: "720p".into(),
            reference: "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
        }
    }

    #[test]
    fn gateway_trims_trailing_slash() {
        let gateway = HttpProviderGateway::new("https://api.provider.example/", "key");
        assert_eq!(gateway.base_url, "https://api.provider.example");
    }

    #[tokio::test]
    async fn submit_returns_queued_job() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generations"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"kind": "video", "model": "tavus-v2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "job_id": "prov_123",
                "status": "queued",
                "created_at": "2025-05-01T12:00:00Z"
            })))
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(server.uri(), "test-key");
        let job = gateway.submit("a red fox", &params()).await.unwrap();

        assert_eq!(job.provider_job_id, "prov_123");
        assert_eq!(job.status, RemoteStatus::Queued);
    }

    #[tokio::test]
    async fn server_error_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generations"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(server.uri(), "test-key");
        let err = gateway.submit("a red fox", &params()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Unavailable { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn client_error_maps_to_rejected_with_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generations"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": "prompt violates content policy",
                "code": "policy_violation"
            })))
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(server.uri(), "test-key");
        let err = gateway.submit("a red fox", &params()).await.unwrap_err();

        match err {
            ProviderError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert!(message.contains("policy_violation"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn contract_violation_maps_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/generations/prov_123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"unexpected": "shape"})),
            )
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(server.uri(), "test-key");
        let err = gateway.fetch_status("prov_123").await.unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
        assert!(!err.is_retryable());
    }
}
