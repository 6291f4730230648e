//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::traits::client::{ClientError, ClientErrorKind};

/// Errors that can occur during extraction operations.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extraction service reported a rate limit.
    ///
    /// Retryable inside the retry controller; callers never see this once
    /// the retry budget exists - they see [`ExtractionError::RetryExhausted`]
    /// instead.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Message reported by the service
        message: String,
    },

    /// The retry budget for a rate-limited segment ran out.
    #[error("retries exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Total attempts made, including the first call
        attempts: u32,
    },

    /// The service response did not decode into the expected payload shape.
    #[error("malformed extraction payload: {0}")]
    SchemaParse(String),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error (invalid profile, missing credential)
    #[error("config error: {0}")]
    Config(String),

    /// Extraction service failed with a non-retryable error
    #[error("extraction service error: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExtractionError {
    /// Whether this error represents cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExtractionError::Cancelled)
    }
}

impl From<ClientError> for ExtractionError {
    fn from(e: ClientError) -> Self {
        match e.kind {
            ClientErrorKind::RateLimit => ExtractionError::RateLimited { message: e.message },
            ClientErrorKind::Cancelled => ExtractionError::Cancelled,
            ClientErrorKind::Other => ExtractionError::Client(Box::new(e)),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
