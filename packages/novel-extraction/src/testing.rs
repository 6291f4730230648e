//! Testing utilities including a mock extraction client.
//!
//! Useful for testing applications that use this library without making
//! real service calls.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::traits::client::{ClientError, ExtractionClient, SegmentRequest};
use tokio_util::sync::CancellationToken;

/// One scripted mock outcome.
#[derive(Debug, Clone)]
enum Scripted {
    Payload(String),
    RateLimit(String),
    Error(String),
}

/// Record of a call made to the mock client.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// The context block the pipeline carried into this call
    pub context: String,

    /// The segment text sent
    pub segment: String,
}

/// A mock extraction client with scripted responses and call tracking.
///
/// Responses are consumed in order; once the script is exhausted every
/// further call returns the default payload (`"{}"` unless overridden).
///
/// # Example
///
/// ```rust,ignore
/// let client = MockExtractor::new()
///     .with_payload(r#"{"characters": [{"name": "三藏"}], "scenes": []}"#)
///     .with_rate_limit()
///     .with_payload("{}");
/// ```
#[derive(Default)]
pub struct MockExtractor {
    script: Arc<RwLock<VecDeque<Scripted>>>,
    default_payload: Arc<RwLock<String>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
    cancel_after: Arc<RwLock<Option<(usize, CancellationToken)>>>,
}

impl MockExtractor {
    /// Create a mock that answers `{}` to everything.
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.default_payload.write().unwrap() = "{}".to_string();
        mock
    }

    /// Queue a successful raw payload.
    pub fn with_payload(self, payload: impl Into<String>) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Scripted::Payload(payload.into()));
        self
    }

    /// Queue a rate-limit failure.
    pub fn with_rate_limit(self) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Scripted::RateLimit("mock quota exceeded".to_string()));
        self
    }

    /// Queue a non-retryable failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Scripted::Error(message.into()));
        self
    }

    /// Set the payload returned once the script is exhausted.
    pub fn with_default_payload(self, payload: impl Into<String>) -> Self {
        *self.default_payload.write().unwrap() = payload.into();
        self
    }

    /// Fire `token` right after serving call number `n` (1-based).
    ///
    /// Lets tests cancel a run between segments deterministically.
    pub fn cancel_after(self, n: usize, token: CancellationToken) -> Self {
        *self.cancel_after.write().unwrap() = Some((n, token));
        self
    }

    /// All calls made to this mock, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ExtractionClient for MockExtractor {
    async fn extract(&self, request: SegmentRequest) -> Result<String, ClientError> {
        self.calls.write().unwrap().push(MockCall {
            context: request.context.clone(),
            segment: request.segment.clone(),
        });

        let count = self.calls.read().unwrap().len();
        if let Some((n, token)) = self.cancel_after.read().unwrap().clone() {
            if count == n {
                token.cancel();
            }
        }

        let scripted = self.script.write().unwrap().pop_front();
        match scripted {
            Some(Scripted::Payload(payload)) => Ok(payload),
            Some(Scripted::RateLimit(message)) => Err(ClientError::rate_limit(message)),
            Some(Scripted::Error(message)) => Err(ClientError::other(message)),
            None => Ok(self.default_payload.read().unwrap().clone()),
        }
    }
}
