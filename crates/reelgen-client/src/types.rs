//! Request and response types for the reelgen API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reelgen_core::{GenerationJob, JobId, JobStatus, Plan, UsageDay};

/// A generation submission.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// The natural-language prompt.
    pub prompt: String,

    /// The provider model to run.
    pub model: String,

    /// Requested media length in seconds. The service applies a plan-aware
    /// default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,

    /// Requested output format. The service picks a default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

/// The service's acknowledgement of an accepted generation.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptedJob {
    /// The job ID, for lookups and refresh.
    pub job_id: JobId,

    /// The provider's job ID.
    pub provider_job_id: String,

    /// Initial job status.
    pub status: JobStatus,

    /// Human-readable acceptance message.
    pub message: String,
}

/// A page of the caller's jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct JobList {
    /// Jobs owned by the caller, newest first.
    pub jobs: Vec<GenerationJob>,
}

/// One counter against its plan limit.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KindUsage {
    /// Generations consumed today.
    pub used: u32,

    /// Daily allowance. `None` = unlimited.
    pub limit: Option<u32>,
}

/// The caller's usage for the current UTC day.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageToday {
    /// The UTC day the counters belong to.
    pub day: UsageDay,

    /// The effective plan the limits derive from.
    pub plan: Plan,

    /// Video generation usage.
    pub video: KindUsage,

    /// Audio generation usage.
    pub audio: KindUsage,

    /// Maximum words allowed per prompt on this plan.
    pub max_prompt_words: u32,
}

/// Payload for the admin profile upsert.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    /// The plan tier to set.
    pub plan: Plan,

    /// When the paid plan lapses, if ever.
    pub plan_expires_at: Option<DateTime<Utc>>,
}

/// Standard API error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
