//! Wire types for the generation provider API.

use chrono::{DateTime, Utc};
use reelgen_core::{JobStatus, MediaKind};
use serde::{Deserialize, Serialize};

/// Submission parameters beyond the prompt itself.
#[derive(Debug, Clone)]
pub struct SubmitParams {
    /// Video or audio.
    pub kind: MediaKind,

    /// The generation model to use.
    pub model: String,

    /// Requested media length in seconds.
    pub duration_seconds: u32,

    /// Resolution for video, container/format for audio.
    pub output_format: String,

    /// Our job ID, echoed back in webhook callbacks for correlation.
    pub reference: String,
}

/// The provider's view of a job, as returned by submit and status calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteJob {
    /// The provider's identifier for this job.
    #[serde(rename = "job_id")]
    pub provider_job_id: String,

    /// The provider-side lifecycle state.
    pub status: RemoteStatus,

    /// Where the finished media lives, once ready.
    #[serde(default)]
    pub media_url: Option<String>,

    /// When the provider accepted the job.
    pub created_at: DateTime<Utc>,
}

/// Provider-side job states.
///
/// Anything outside this set fails deserialization and surfaces as
/// `ProviderError::MalformedResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    /// Accepted, generation in progress.
    Queued,

    /// Finished; `media_url` should be set.
    Ready,

    /// Terminal failure on the provider side.
    Failed,
}

impl From<RemoteStatus> for JobStatus {
    fn from(status: RemoteStatus) -> Self {
        match status {
            RemoteStatus::Queued => Self::Queued,
            RemoteStatus::Ready => Self::Ready,
            RemoteStatus::Failed => Self::Failed,
        }
    }
}

/// Request body for the provider's generation endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub kind: &'a str,
    pub prompt: &'a str,
    pub model: &'a str,
    pub duration_seconds: u32,
    pub output_format: &'a str,
    pub reference: &'a str,
}

/// Error body the provider returns on 4xx/5xx.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_job_deserializes_without_media_url() {
        let body = serde_json::json!({
            "job_id": "prov_abc",
            "status": "queued",
            "created_at": "2025-05-01T12:00:00Z"
        });
        let job: RemoteJob = serde_json::from_value(body).unwrap();
        assert_eq!(job.status, RemoteStatus::Queued);
        assert!(job.media_url.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let body = serde_json::json!({
            "job_id": "prov_abc",
            "status": "rendering",
            "created_at": "2025-05-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<RemoteJob>(body).is_err());
    }
}
