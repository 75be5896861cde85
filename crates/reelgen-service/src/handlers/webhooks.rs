//! Provider webhook handler.
//!
//! The generation provider pushes terminal status changes here, carrying the
//! `reference` we supplied at submission time (our job ID). Signatures are
//! HMAC-SHA256 over the raw body, hex-encoded, in `x-provider-signature`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use reelgen_core::{JobId, JobStatus};
use reelgen_store::JobStore;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::error::ApiError;
use crate::provider::RemoteStatus;
use crate::state::AppState;

/// Payload pushed by the provider on a status change.
#[derive(Debug, Deserialize)]
pub struct ProviderWebhookPayload {
    /// The reference we passed at submission time: our job ID.
    pub reference: String,

    /// The new remote status.
    pub status: RemoteStatus,

    /// URL of the produced media, present when `status` is `ready`.
    pub media_url: Option<String>,
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// Whether the event was accepted.
    pub received: bool,
}

/// Handle a status-change push from the generation provider.
pub async fn provider_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    verify_signature(&state, &headers, &body)?;

    let payload: ProviderWebhookPayload = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid webhook payload: {e}")))?;

    let job_id = payload
        .reference
        .parse::<JobId>()
        .map_err(|_| ApiError::BadRequest("invalid job reference".to_string()))?;

    let new_status = JobStatus::from(payload.status);
    if new_status == JobStatus::Queued {
        // Nothing to do: jobs are queued from birth.
        tracing::debug!(job_id = %job_id, "Ignoring non-terminal webhook event");
        return Ok(Json(WebhookAck { received: true }));
    }

    let store = state.store()?;
    let job = store.update_status(&job_id, new_status, payload.media_url)?;

    tracing::info!(
        job_id = %job.id,
        status = %job.status.as_str(),
        "Applied provider webhook event"
    );

    Ok(Json(WebhookAck { received: true }))
}

/// Verify the webhook signature when a secret is configured.
///
/// Without a configured secret the event is accepted but logged loudly, so
/// fresh deployments fail open rather than dropping provider callbacks.
fn verify_signature(state: &AppState, headers: &HeaderMap, body: &str) -> Result<(), ApiError> {
    let Some(secret) = state.config.provider_webhook_secret.as_ref() else {
        tracing::warn!("PROVIDER_WEBHOOK_SECRET not configured; skipping signature verification");
        return Ok(());
    };

    let signature = headers
        .get("x-provider-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let expected = hmac_sha256_hex(secret, body);
    if !constant_time_eq(signature, &expected) {
        tracing::warn!("Webhook signature mismatch");
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}
