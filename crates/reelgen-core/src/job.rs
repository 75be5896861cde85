//! Generation job types.
//!
//! A [`GenerationJob`] tracks one prompt submission from acceptance by the
//! provider through to a terminal `ready` or `failed` state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, UserId};

/// The kind of media a job generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Text-to-video generation.
    Video,

    /// Text-to-audio generation.
    Audio,
}

impl MediaKind {
    /// Get the kind name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// Lifecycle state of a generation job.
///
/// `Queued` is the only non-terminal state. Once a job reaches `Ready` or
/// `Failed` it is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted by the provider, generation in progress.
    Queued,

    /// Generation finished; `media_url` is set.
    Ready,

    /// The provider reported a terminal failure.
    Failed,
}

impl JobStatus {
    /// Whether this status permits no further transition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Get the status name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Stable single-byte tag used in store index keys.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Ready => 1,
            Self::Failed => 2,
        }
    }
}

/// A persisted generation job.
///
/// Invariant: `media_url` is `Some` if and only if `status == Ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Internally assigned identifier (time-ordered ULID).
    pub id: JobId,

    /// The user who submitted the prompt.
    pub user_id: UserId,

    /// Video or audio.
    pub kind: MediaKind,

    /// The original text prompt.
    pub prompt: String,

    /// The generation model requested by the caller.
    pub model_used: String,

    /// Requested media length in seconds.
    pub duration_seconds: u32,

    /// Resolution for video ("720p"), container/format for audio ("mp3").
    pub output_format: String,

    /// The provider's identifier for this job.
    pub provider_job_id: String,

    /// Where the finished media can be fetched. Set iff the job is `Ready`.
    pub media_url: Option<String>,

    /// Current lifecycle state.
    pub status: JobStatus,

    /// When the job was created.
    pub created_at: DateTime<Utc>,

    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Construct a freshly queued job for a successful provider submission.
    ///
    /// The `id` is minted by the caller before the provider call so it can
    /// travel to the provider as the webhook correlation reference.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn queued(
        id: JobId,
        user_id: UserId,
        kind: MediaKind,
        prompt: String,
        model_used: String,
        duration_seconds: u32,
        output_format: String,
        provider_job_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            kind,
            prompt,
            model_used,
            duration_seconds,
            output_format,
            provider_job_id,
            media_url: None,
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the job ready with its media URL.
    ///
    /// Used when the provider already reports a terminal success at
    /// submission time; stored transitions go through the job store.
    #[must_use]
    pub fn into_ready(mut self, media_url: String) -> Self {
        self.status = JobStatus::Ready;
        self.media_url = Some(media_url);
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> GenerationJob {
        GenerationJob::queued(
            JobId::generate(),
            UserId::generate(),
            MediaKind::Video,
            "a red fox in the snow".into(),
            "tavus-v2".into(),
            10,
            "720p".into(),
            "prov_123".into(),
        )
    }

    #[test]
    fn queued_job_has_no_media_url() {
        let job = sample_job();
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.media_url.is_none());
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn into_ready_sets_media_url() {
        let job = sample_job().into_ready("https://cdn.example/clip.mp4".into());
        assert_eq!(job.status, JobStatus::Ready);
        assert_eq!(job.media_url.as_deref(), Some("https://cdn.example/clip.mp4"));
        assert!(job.status.is_terminal());
    }

    #[test]
    fn status_serde_snake_case() {
        assert_eq!(serde_json::to_string(&JobStatus::Queued).unwrap(), "\"queued\"");
        let parsed: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, JobStatus::Failed);
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Ready.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
    }
}
