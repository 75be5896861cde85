//! Error types for reelgen storage.

use reelgen_core::JobStatus;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind ("job", "profile").
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// The daily quota for a media kind is exhausted.
    #[error("quota exceeded: limit={limit}, used={used}")]
    QuotaExceeded {
        /// The daily limit the reservation was checked against.
        limit: u32,
        /// The counter value at check time.
        used: u32,
    },

    /// A job status transition out of a terminal state was attempted.
    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// The current (terminal) status.
        from: JobStatus,
        /// The requested status.
        to: JobStatus,
    },

    /// A `ready` transition was requested without a media URL.
    #[error("media_url is required to mark a job ready")]
    MediaUrlRequired,
}
