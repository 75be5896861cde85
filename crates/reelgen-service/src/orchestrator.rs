//! The generation orchestrator.
//!
//! Composes the quota policy, the usage ledger, the provider gateway, and the
//! job store into the request path: validate, reserve quota, dispatch to the
//! provider, persist the job. The quota increment is a *reservation* taken
//! before the provider call; the orchestrator is the only component that
//! translates a provider failure into a compensating release.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use reelgen_core::{
    limits_for, GenerationJob, JobId, JobStatus, MediaKind, UsageDay, UserId, UserProfile,
};
use reelgen_store::{JobStore, ProfileStore, RocksStore, StoreError, UsageLedger};

use crate::provider::{ProviderError, ProviderGateway, RemoteStatus, SubmitParams};

/// Default video length in seconds when the caller doesn't ask for one.
const DEFAULT_VIDEO_SECONDS: u32 = 10;

/// Default audio length in seconds when the caller doesn't ask for one.
const DEFAULT_AUDIO_SECONDS: u32 = 30;

/// Default video resolution.
const DEFAULT_VIDEO_FORMAT: &str = "720p";

/// Default audio container.
const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// A validated-at-the-edge generation submission.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt.
    pub prompt: String,

    /// The generation model to use.
    pub model: String,

    /// Requested media length in seconds (plan-capped default if absent).
    #[serde(default)]
    pub duration_seconds: Option<u32>,

    /// Resolution for video, container for audio.
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Errors from the orchestration path.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Client input fault: empty prompt, missing model, over-limit sizes.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The daily quota for this media kind is exhausted.
    #[error("quota exceeded: limit={limit}, used={used}")]
    QuotaExceeded {
        /// The daily limit.
        limit: u32,
        /// Generations already consumed today.
        used: u32,
    },

    /// The provider call failed; the reservation was released.
    #[error("generation failed: {0}")]
    GenerationFailed(#[from] ProviderError),

    /// Persistence fault.
    #[error("storage error: {0}")]
    Storage(StoreError),

    /// The requested job does not exist.
    #[error("job not found: {0}")]
    JobNotFound(JobId),
}

impl From<StoreError> for OrchestratorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::QuotaExceeded { limit, used } => Self::QuotaExceeded { limit, used },
            other => Self::Storage(other),
        }
    }
}

/// Validates, authorizes, dispatches, and persists generation requests.
pub struct GenerationOrchestrator {
    store: Arc<RocksStore>,
    provider: Arc<dyn ProviderGateway>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator over the given store and provider gateway.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, provider: Arc<dyn ProviderGateway>) -> Self {
        Self { store, provider }
    }

    /// Handle one generation submission end to end.
    ///
    /// `now` is passed explicitly so quota evaluation is deterministic.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` before any quota is consumed or provider called.
    /// - `QuotaExceeded` with no provider call made.
    /// - `GenerationFailed` after the reservation has been released.
    /// - `Storage` on persistence faults.
    pub async fn request(
        &self,
        user_id: &UserId,
        kind: MediaKind,
        req: GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<GenerationJob, OrchestratorError> {
        let prompt = req.prompt.trim();
        if prompt.is_empty() {
            return Err(OrchestratorError::InvalidRequest("prompt is required".into()));
        }
        if req.model.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest("model is required".into()));
        }

        // A user the billing system hasn't written yet is on the free tier.
        let profile = self
            .store
            .get_profile(user_id)?
            .unwrap_or_else(|| UserProfile::free(*user_id));
        let limits = limits_for(&profile, now);

        let word_count = prompt.split_whitespace().count();
        if word_count > limits.max_prompt_words as usize {
            return Err(OrchestratorError::InvalidRequest(format!(
                "prompt has {word_count} words, plan allows {}",
                limits.max_prompt_words
            )));
        }

        let duration_seconds = req.duration_seconds.unwrap_or(match kind {
            MediaKind::Video => DEFAULT_VIDEO_SECONDS,
            MediaKind::Audio => DEFAULT_AUDIO_SECONDS,
        });
        let max_seconds = limits.max_media_seconds(kind);
        if duration_seconds == 0 || duration_seconds > max_seconds {
            return Err(OrchestratorError::InvalidRequest(format!(
                "duration must be between 1 and {max_seconds} seconds"
            )));
        }

        let output_format = req.output_format.unwrap_or_else(|| {
            match kind {
                MediaKind::Video => DEFAULT_VIDEO_FORMAT,
                MediaKind::Audio => DEFAULT_AUDIO_FORMAT,
            }
            .to_string()
        });

        // Reservation: increment-with-limit-check before the provider call.
        let day = UsageDay::from_datetime(now);
        let snapshot =
            self.store
                .try_consume(user_id, day, kind, limits.max_generations_per_day)?;

        tracing::debug!(
            user_id = %user_id,
            kind = %kind.as_str(),
            day = %day,
            used = snapshot.used,
            "Quota reserved"
        );

        // The job ID is minted before the submit so the provider can echo it
        // back in webhook callbacks.
        let job_id = JobId::generate();
        let params = SubmitParams {
            kind,
            model: req.model.clone(),
            duration_seconds,
            output_format: output_format.clone(),
            reference: job_id.to_string(),
        };

        let remote = match self.provider.submit(prompt, &params).await {
            Ok(remote) => remote,
            Err(cause) => {
                // Compensate before surfacing: a failed attempt must not
                // charge quota. The ledger is never locked across this await.
                self.release_reservation(user_id, day, kind);
                return Err(OrchestratorError::GenerationFailed(cause));
            }
        };

        // A provider that reports terminal failure at submission time never
        // produced a job worth charging for either.
        if remote.status == RemoteStatus::Failed {
            self.release_reservation(user_id, day, kind);
            return Err(OrchestratorError::GenerationFailed(
                ProviderError::Rejected {
                    status: 200,
                    message: "provider reported failure at submission".into(),
                },
            ));
        }

        let mut job = GenerationJob::queued(
            job_id,
            *user_id,
            kind,
            prompt.to_string(),
            req.model,
            duration_seconds,
            output_format,
            remote.provider_job_id,
        );

        // Some providers finish synchronously for short media.
        if remote.status == RemoteStatus::Ready {
            if let Some(media_url) = remote.media_url {
                job = job.into_ready(media_url);
            } else {
                tracing::warn!(
                    job_id = %job.id,
                    "Provider reported ready without media_url; keeping job queued"
                );
            }
        }

        self.store.create(&job)?;

        // The reservation is final once the job is persisted; this is the
        // commit marker.
        tracing::info!(
            job_id = %job.id,
            user_id = %user_id,
            kind = %kind.as_str(),
            status = %job.status.as_str(),
            used = snapshot.used,
            limit = ?snapshot.limit,
            "Generation dispatched, usage committed"
        );

        Ok(job)
    }

    /// Poll the provider for a job's current state and apply the transition.
    ///
    /// Terminal jobs are returned unchanged without a provider call.
    ///
    /// # Errors
    ///
    /// - `JobNotFound` if the job doesn't exist.
    /// - `GenerationFailed` if the provider can't be reached or breaks
    ///   contract.
    /// - `Storage` on persistence faults.
    pub async fn refresh(&self, job_id: &JobId) -> Result<GenerationJob, OrchestratorError> {
        let job = self
            .store
            .get(job_id)?
            .ok_or(OrchestratorError::JobNotFound(*job_id))?;

        if job.status.is_terminal() {
            return Ok(job);
        }

        let remote = self.provider.fetch_status(&job.provider_job_id).await?;

        let updated = match remote.status {
            RemoteStatus::Queued => job,
            RemoteStatus::Ready => {
                let media_url = remote.media_url.ok_or_else(|| {
                    OrchestratorError::GenerationFailed(ProviderError::MalformedResponse {
                        detail: "ready status without media_url".into(),
                    })
                })?;
                self.store
                    .update_status(job_id, JobStatus::Ready, Some(media_url))?
            }
            RemoteStatus::Failed => self.store.update_status(job_id, JobStatus::Failed, None)?,
        };

        Ok(updated)
    }

    fn release_reservation(&self, user_id: &UserId, day: UsageDay, kind: MediaKind) {
        if let Err(release_err) = self.store.release(user_id, day, kind) {
            // The quota charge sticks for this user-day; surfaced in logs
            // since the provider error is the one the caller needs.
            tracing::error!(
                user_id = %user_id,
                day = %day,
                kind = %kind.as_str(),
                error = %release_err,
                "Failed to release quota reservation"
            );
        }
    }
}
