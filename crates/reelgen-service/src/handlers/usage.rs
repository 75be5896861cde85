//! Usage reporting handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use reelgen_core::{effective_plan, limits_for, MediaKind, Plan, UsageDay, UserProfile};
use reelgen_store::{ProfileStore, UsageLedger};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// A single counter against its plan limit.
#[derive(Debug, Serialize)]
pub struct KindUsage {
    /// Generations consumed today.
    pub used: u32,

    /// Daily allowance. `None` = unlimited.
    pub limit: Option<u32>,
}

/// The caller's usage for the current UTC day.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    /// The UTC day the counters belong to.
    pub day: UsageDay,

    /// The plan the limits were derived from (after expiry downgrade).
    pub plan: Plan,

    /// Video generation usage.
    pub video: KindUsage,

    /// Audio generation usage.
    pub audio: KindUsage,

    /// Maximum words allowed per prompt on this plan.
    pub max_prompt_words: u32,
}

/// Report the caller's counters and limits for today.
pub async fn today_usage(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UsageResponse>, ApiError> {
    let store = state.store()?;

    let now = Utc::now();
    let day = UsageDay::from_datetime(now);

    let profile = store
        .get_profile(&auth.user_id)?
        .unwrap_or_else(|| UserProfile::free(auth.user_id));
    let plan = effective_plan(&profile, now);
    let limits = limits_for(&profile, now);

    let record = store.record_for(&auth.user_id, day)?;
    let count = |kind: MediaKind| record.as_ref().map_or(0, |r| r.count(kind));

    Ok(Json(UsageResponse {
        day,
        plan,
        video: KindUsage {
            used: count(MediaKind::Video),
            limit: limits.max_generations_per_day,
        },
        audio: KindUsage {
            used: count(MediaKind::Audio),
            limit: limits.max_generations_per_day,
        },
        max_prompt_words: limits.max_prompt_words,
    }))
}
