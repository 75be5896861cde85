//! Generation submission handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use reelgen_core::{JobId, JobStatus, MediaKind};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::orchestrator::{GenerationOrchestrator, GenerationRequest};
use crate::state::AppState;

/// Response for an accepted generation request.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Our job ID, for lookups and refresh.
    pub job_id: JobId,

    /// The provider's job ID.
    pub provider_job_id: String,

    /// Initial job status (usually `queued`).
    pub status: JobStatus,

    /// Human-readable acceptance message.
    pub message: String,
}

/// Submit a text-to-video generation request.
pub async fn generate_video(
    state: State<Arc<AppState>>,
    auth: AuthUser,
    body: Json<GenerationRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    submit(state, auth, MediaKind::Video, body).await
}

/// Submit a text-to-audio generation request.
pub async fn generate_audio(
    state: State<Arc<AppState>>,
    auth: AuthUser,
    body: Json<GenerationRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    submit(state, auth, MediaKind::Audio, body).await
}

async fn submit(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    kind: MediaKind,
    Json(body): Json<GenerationRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    tracing::debug!(
        user_id = %auth.user_id,
        kind = %kind.as_str(),
        model = %body.model,
        prompt_len = body.prompt.len(),
        "Processing generation request"
    );

    let store = state.store()?;
    let provider = state.provider()?;
    let orchestrator = GenerationOrchestrator::new(store, provider);

    let job = orchestrator
        .request(&auth.user_id, kind, body, chrono::Utc::now())
        .await?;

    let message = match job.status {
        JobStatus::Ready => "Generation finished.".to_string(),
        _ => "Generation started. Check back for updates.".to_string(),
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            job_id: job.id,
            provider_job_id: job.provider_job_id,
            status: job.status,
            message,
        }),
    ))
}
