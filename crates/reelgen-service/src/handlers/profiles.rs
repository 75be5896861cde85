//! Admin profile handlers.
//!
//! The external billing system calls these to push subscription changes.
//! They are the only write path for profiles; the request path reads them.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use reelgen_core::{Plan, UserId, UserProfile};
use reelgen_store::ProfileStore;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Payload for upserting a subscription profile.
#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    /// The plan tier billing has sold.
    pub plan: Plan,

    /// When the paid plan lapses, if ever.
    pub plan_expires_at: Option<DateTime<Utc>>,
}

/// Insert or replace a user's subscription profile.
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(user_id): Path<UserId>,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store()?;

    let now = Utc::now();
    let profile = match store.get_profile(&user_id)? {
        Some(mut existing) => {
            existing.plan = body.plan;
            existing.plan_expires_at = body.plan_expires_at;
            existing.updated_at = now;
            existing
        }
        None => UserProfile {
            user_id,
            plan: body.plan,
            plan_expires_at: body.plan_expires_at,
            created_at: now,
            updated_at: now,
        },
    };

    store.put_profile(&profile)?;

    tracing::info!(
        user_id = %user_id,
        plan = %profile.plan.as_str(),
        "Updated subscription profile"
    );

    Ok(Json(profile))
}
