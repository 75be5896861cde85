//! Client error types.

/// Errors that can occur when using the reelgen client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The daily generation quota is exhausted.
    #[error("quota exceeded: limit={limit}, used={used}")]
    QuotaExceeded {
        /// The daily limit.
        limit: u32,
        /// Generations already consumed today.
        used: u32,
    },

    /// The provider could not produce the generation.
    #[error("generation failed: {message}")]
    GenerationFailed {
        /// Error message from the service.
        message: String,
    },

    /// Job not found.
    #[error("job not found: {message}")]
    JobNotFound {
        /// Error message from the service.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
