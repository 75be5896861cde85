//! The external generation provider boundary.
//!
//! The provider is an opaque dependency: we submit a prompt, receive a job
//! descriptor, and later learn the outcome by polling or webhook. The
//! [`ProviderGateway`] trait is the seam; [`HttpProviderGateway`] is the
//! production implementation over its HTTP API.

mod client;
mod types;

pub use client::HttpProviderGateway;
pub use types::{RemoteJob, RemoteStatus, SubmitParams};

use async_trait::async_trait;

/// Errors from the generation provider, classified by retryability.
///
/// `Unavailable` is safe for the *caller* to retry with backoff; the gateway
/// itself never retries. Provider error payloads are carried structurally so
/// handlers can log them without leaking them to users.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network failure, timeout, or a 5xx from the provider.
    #[error("provider unavailable: {detail}")]
    Unavailable {
        /// Transport or upstream detail, for logs only.
        detail: String,
    },

    /// The provider rejected the request (4xx: prompt/policy violation).
    #[error("provider rejected request ({status}): {message}")]
    Rejected {
        /// The provider's HTTP status code.
        status: u16,
        /// The provider's error message, for logs only.
        message: String,
    },

    /// The provider broke its own response contract.
    #[error("malformed provider response: {detail}")]
    MalformedResponse {
        /// What failed to parse, for logs only.
        detail: String,
    },
}

impl ProviderError {
    /// Whether the caller may retry this failure with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Stable machine-readable kind tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Rejected { .. } => "rejected",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}

/// The contract between the request path and the generation provider.
///
/// Implementations pass prompts through unvalidated (the orchestrator already
/// validated them) and must not swallow provider error payloads: failures
/// surface as structured [`ProviderError`] kinds.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Submit a prompt for generation.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on non-2xx responses, timeouts, or
    /// contract violations.
    async fn submit(&self, prompt: &str, params: &SubmitParams) -> Result<RemoteJob, ProviderError>;

    /// Fetch the provider's current view of a submitted job.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on non-2xx responses, timeouts, or
    /// contract violations.
    async fn fetch_status(&self, provider_job_id: &str) -> Result<RemoteJob, ProviderError>;
}
