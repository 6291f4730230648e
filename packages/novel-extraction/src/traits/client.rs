//! ExtractionClient trait - the boundary to the text-understanding service.
//!
//! Implementations wrap a specific provider and handle the specifics of
//! transport and authentication. The pipeline owns prompting, parsing,
//! retry, pacing and merging; the client only turns one request into one
//! raw response string.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// One segment's worth of work for the extraction service.
///
/// `prompt` is the fully formatted prompt (template with context and segment
/// already substituted). `context` and `segment` are also carried separately
/// for clients that split the request into system/user roles.
#[derive(Debug, Clone)]
pub struct SegmentRequest {
    /// Fully formatted prompt text
    pub prompt: String,

    /// Summary of entities known from prior segments (may be empty)
    pub context: String,

    /// The raw segment text
    pub segment: String,

    /// Cancellation signal; implementations should fail fast with
    /// [`ClientErrorKind::Cancelled`] when it fires mid-call.
    pub cancel: CancellationToken,
}

/// Classification of a client failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// The service signalled that the caller exceeded its allowed
    /// call frequency. The only retryable kind.
    RateLimit,

    /// The call observed the cancellation signal.
    Cancelled,

    /// Anything else - transport failure, auth failure, server error.
    Other,
}

/// Error returned by an [`ExtractionClient`] call.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    /// What kind of failure this is
    pub kind: ClientErrorKind,

    /// HTTP status code, when the transport exposes one
    pub status: Option<u16>,

    /// Human-readable message from the service or transport
    pub message: String,
}

impl ClientError {
    /// A rate-limit failure.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self {
            kind: ClientErrorKind::RateLimit,
            status: None,
            message: message.into(),
        }
    }

    /// A cancellation observed mid-call.
    pub fn cancelled() -> Self {
        Self {
            kind: ClientErrorKind::Cancelled,
            status: None,
            message: "call cancelled".to_string(),
        }
    }

    /// Any other failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: ClientErrorKind::Other,
            status: None,
            message: message.into(),
        }
    }

    /// Attach an HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether this failure should be treated as a rate limit.
    ///
    /// True for an explicit [`ClientErrorKind::RateLimit`], an HTTP 429
    /// status, or a quota-exhaustion message signature. Providers are not
    /// consistent about which of the three they use.
    pub fn is_rate_limit(&self) -> bool {
        if self.kind == ClientErrorKind::RateLimit {
            return true;
        }
        if self.status == Some(429) {
            return true;
        }
        let lower = self.message.to_lowercase();
        lower.contains("resource_exhausted")
            || lower.contains("rate limit")
            || lower.contains("quota")
    }
}

/// The boundary to the external text-understanding service.
///
/// One call per segment. Returns the raw response body; the pipeline
/// decodes it so the debug log can capture exactly what came back.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Run one extraction call for a segment.
    async fn extract(&self, request: SegmentRequest) -> Result<String, ClientError>;
}
