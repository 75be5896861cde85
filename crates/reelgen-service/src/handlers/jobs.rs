//! Job lookup, listing, and refresh handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use reelgen_core::{GenerationJob, JobId};
use reelgen_store::JobStore;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::orchestrator::GenerationOrchestrator;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// Query parameters for job listing.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    /// Maximum number of jobs to return (default 20, capped at 100).
    pub limit: Option<usize>,

    /// Number of jobs to skip.
    pub offset: Option<usize>,
}

/// Response for a job listing.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    /// Jobs owned by the caller, newest first.
    pub jobs: Vec<GenerationJob>,
}

/// Fetch a single job by ID. Only the owner may read it.
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(job_id): Path<JobId>,
) -> Result<Json<GenerationJob>, ApiError> {
    let store = state.store()?;

    let job = store
        .get(&job_id)?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id} not found")))?;

    if job.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(job))
}

/// List the caller's jobs, newest first.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<JobListResponse>, ApiError> {
    let store = state.store()?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let jobs = store.list_by_user(&auth.user_id, limit, offset)?;

    Ok(Json(JobListResponse { jobs }))
}

/// Re-poll the provider for a queued job and persist any status change.
pub async fn refresh_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(job_id): Path<JobId>,
) -> Result<Json<GenerationJob>, ApiError> {
    let store = state.store()?;

    // Ownership check before touching the provider.
    let job = store
        .get(&job_id)?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id} not found")))?;

    if job.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    let provider = state.provider()?;
    let orchestrator = GenerationOrchestrator::new(store, provider);

    let job = orchestrator.refresh(&job_id).await?;

    Ok(Json(job))
}
