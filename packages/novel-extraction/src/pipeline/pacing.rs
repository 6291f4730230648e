//! Call pacing - minimum wall-clock spacing between segment calls.
//!
//! Distinct from retry backoff: pacing applies between ordinary calls to
//! stay under the provider's sustained rate, backoff applies after the
//! provider has already pushed back.

use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use tokio_util::sync::CancellationToken;

use crate::error::{ExtractionError, Result};

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Enforces a minimum interval between call starts.
///
/// Acquiring a permit immediately before each call spaces call starts at
/// least `interval` apart, which is the same schedule as sleeping
/// `interval - elapsed` after each call. The first permit is free, so the
/// first segment is never delayed.
pub struct Pacer {
    limiter: Option<Arc<DirectLimiter>>,
}

impl Pacer {
    /// Create a pacer with the given minimum interval between call
    /// starts. A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        let quota = Quota::with_period(interval).map(|q| q.allow_burst(nonzero!(1u32)));
        Self {
            limiter: quota.map(|q| Arc::new(RateLimiter::direct(q))),
        }
    }

    /// Wait until the next call may start. The wait is a cancellation
    /// point; a cancelled wait returns [`ExtractionError::Cancelled`].
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
            _ = limiter.until_ready() => Ok(()),
        }
    }
}
