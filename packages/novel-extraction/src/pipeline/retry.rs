//! Retry controller for rate-limited service calls.
//!
//! Only classified rate-limit failures are retried; everything else
//! propagates immediately. Waits follow an exponential backoff schedule
//! with uniform jitter, and every wait - and the call itself - races the
//! cancellation token.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{ExtractionError, Result};
use crate::traits::client::ClientError;
use crate::types::config::RetryConfig;

/// Backoff wait before retry `attempt` (0-indexed):
/// `base * 2^attempt + uniform(0, jitter)`.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay_ms.saturating_mul(1u64 << attempt.min(16));
    let jitter = if config.jitter_ms == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..config.jitter_ms)
    };
    Duration::from_millis(base + jitter)
}

/// Run `operation`, retrying classified rate-limit failures up to
/// `config.max_retries` times.
///
/// The cancellation token is checked before every backoff sleep - a
/// cancelled wait never issues the next call - and the in-flight call
/// itself races the token, so a client that ignores the signal has its
/// result discarded rather than used once cancellation is observed.
///
/// After the final attempt a rate limit surfaces as
/// [`ExtractionError::RetryExhausted`] rather than the underlying error.
pub async fn with_retries<T, F, Fut>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ClientError>>,
{
    let mut attempt: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            result = operation() => result,
            _ = cancel.cancelled() => return Err(ExtractionError::Cancelled),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limit() => {
                if attempt >= config.max_retries {
                    return Err(ExtractionError::RetryExhausted {
                        attempts: attempt + 1,
                    });
                }
                let delay = backoff_delay(config, attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ExtractionError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
