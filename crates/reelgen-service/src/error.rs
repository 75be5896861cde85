//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::orchestrator::OrchestratorError;
use crate::provider::ProviderError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but insufficient permissions.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Daily generation quota exhausted.
    #[error("quota exceeded: limit={limit}, used={used}")]
    QuotaExceeded {
        /// The daily limit.
        limit: u32,
        /// Generations already consumed today.
        used: u32,
    },

    /// A job status transition out of a terminal state was attempted.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The generation provider failed. The structured cause is logged; the
    /// response body carries only a generic message.
    #[error("generation failed")]
    GenerationFailed(ProviderError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::QuotaExceeded { limit, used } => (
                StatusCode::CONFLICT,
                "quota_exceeded",
                "daily generation limit reached".to_string(),
                Some(serde_json::json!({
                    "limit": limit,
                    "used": used
                })),
            ),
            Self::InvalidTransition(msg) => (
                StatusCode::CONFLICT,
                "invalid_transition",
                msg.clone(),
                None,
            ),
            Self::GenerationFailed(cause) => {
                // Raw provider payloads stay in the diagnostic channel.
                tracing::error!(kind = cause.kind(), error = %cause, "Generation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "generation_failed",
                    "media generation is temporarily unavailable, please try again".to_string(),
                    Some(serde_json::json!({ "kind": cause.kind() })),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<reelgen_store::StoreError> for ApiError {
    fn from(err: reelgen_store::StoreError) -> Self {
        match err {
            reelgen_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            reelgen_store::StoreError::QuotaExceeded { limit, used } => {
                Self::QuotaExceeded { limit, used }
            }
            reelgen_store::StoreError::InvalidTransition { from, to } => Self::InvalidTransition(
                format!("cannot move a {} job to {}", from.as_str(), to.as_str()),
            ),
            reelgen_store::StoreError::MediaUrlRequired => {
                Self::BadRequest("media_url is required to mark a job ready".into())
            }
            reelgen_store::StoreError::Database(msg)
            | reelgen_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::InvalidRequest(msg) => Self::BadRequest(msg),
            OrchestratorError::QuotaExceeded { limit, used } => {
                Self::QuotaExceeded { limit, used }
            }
            OrchestratorError::GenerationFailed(cause) => Self::GenerationFailed(cause),
            OrchestratorError::Storage(store_err) => store_err.into(),
            OrchestratorError::JobNotFound(id) => Self::NotFound(format!("job not found: {id}")),
        }
    }
}
