//! Per-segment debug log entries.
//!
//! The run keeps one immutable entry per segment attempt (not per retry),
//! in segment order, so a failed extraction can be diagnosed from what the
//! service actually said.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::candidate::SegmentPayload;

/// One segment's debug record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    /// When the segment attempt finished
    pub timestamp: DateTime<Utc>,

    /// 0-based, contiguous segment index
    pub segment_index: usize,

    /// Raw response body; empty when the call itself failed
    #[serde(default)]
    pub raw_response: String,

    /// Decoded payload; `None` when the call failed or the body did not
    /// decode
    #[serde(default)]
    pub parsed: Option<SegmentPayload>,

    /// The prompt sent to the service; recorded for the first segment only
    #[serde(default)]
    pub prompt_used: Option<String>,

    /// Failure description; present only on failure
    #[serde(default)]
    pub error: Option<String>,
}

impl DebugLogEntry {
    /// Entry for a segment whose response decoded successfully.
    pub fn success(segment_index: usize, raw_response: String, parsed: SegmentPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            segment_index,
            raw_response,
            parsed: Some(parsed),
            prompt_used: None,
            error: None,
        }
    }

    /// Entry for a failed segment. `raw_response` should be empty when the
    /// call itself failed, and the undecodable body when parsing failed.
    pub fn failure(segment_index: usize, raw_response: String, error: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            segment_index,
            raw_response,
            parsed: None,
            prompt_used: None,
            error: Some(error.into()),
        }
    }

    /// Attach the prompt (first segment only).
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_used = Some(prompt.into());
        self
    }
}
