//! Configuration types for the extraction pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Capabilities and limits of one extraction model.
///
/// Selected externally; the active profile determines the chunker's
/// segment bound and the default inter-call pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Provider-side model identifier
    pub id: String,

    /// Maximum characters per segment sent in one call
    pub max_chunk_chars: usize,

    /// Provider's allowed requests per minute; 0 disables pacing
    pub requests_per_minute: u32,
}

impl ModelProfile {
    /// Create a profile.
    pub fn new(id: impl Into<String>, max_chunk_chars: usize, requests_per_minute: u32) -> Self {
        Self {
            id: id.into(),
            max_chunk_chars,
            requests_per_minute,
        }
    }

    /// Fast free-tier model: small segments, tight rate limit.
    pub fn flash() -> Self {
        Self::new("gemini-2.0-flash", 20_000, 10)
    }

    /// Slower high-quality model: larger segments, tighter rate limit.
    pub fn pro() -> Self {
        Self::new("gemini-2.5-pro", 30_000, 5)
    }

    /// Minimum spacing between call starts implied by the rate limit.
    pub fn pacing_delay(&self) -> Duration {
        if self.requests_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(60_000 / self.requests_per_minute as u64)
    }
}

impl Default for ModelProfile {
    fn default() -> Self {
        Self::flash()
    }
}

/// Retry policy for rate-limited calls.
///
/// Attempt `i` (0-indexed) waits `base_delay_ms * 2^i` plus a uniform
/// random jitter in `[0, jitter_ms)` before retrying.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Base delay for the backoff schedule
    pub base_delay_ms: u64,

    /// Upper bound of the uniform jitter added to each wait
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            jitter_ms: 250,
        }
    }
}

/// Configuration for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Active model profile
    pub profile: ModelProfile,

    /// Retry policy for rate-limited calls
    pub retry: RetryConfig,

    /// Maximum entities per kind listed in the carried-over context
    /// summary; truncation follows insertion order
    pub context_entity_limit: usize,

    /// Explicit pacing override in milliseconds; `None` derives the
    /// spacing from the profile's rate limit
    pub pacing_override_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: ModelProfile::default(),
            retry: RetryConfig::default(),
            context_entity_limit: 20,
            pacing_override_ms: None,
        }
    }
}

impl PipelineConfig {
    /// Create a config with the given profile and defaults elsewhere.
    pub fn new(profile: ModelProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the context entity limit.
    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_entity_limit = limit;
        self
    }

    /// Override the derived pacing delay.
    pub fn with_pacing_ms(mut self, ms: u64) -> Self {
        self.pacing_override_ms = Some(ms);
        self
    }

    /// Effective minimum spacing between call starts.
    pub fn pacing_delay(&self) -> Duration {
        match self.pacing_override_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.profile.pacing_delay(),
        }
    }

    /// Validate the configuration before any segment is processed.
    pub fn validate(&self) -> Result<(), String> {
        if self.profile.id.is_empty() {
            return Err("model profile id must not be empty".to_string());
        }
        if self.profile.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = PipelineConfig::default();
        config.profile.max_chunk_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pacing_derived_from_rate_limit() {
        let profile = ModelProfile::new("m", 10_000, 6);
        assert_eq!(profile.pacing_delay(), Duration::from_secs(10));

        let unlimited = ModelProfile::new("m", 10_000, 0);
        assert_eq!(unlimited.pacing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_pacing_override_wins() {
        let config = PipelineConfig::default().with_pacing_ms(1_500);
        assert_eq!(config.pacing_delay(), Duration::from_millis(1_500));
    }
}
