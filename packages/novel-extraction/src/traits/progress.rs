//! Progress reporting trait.
//!
//! The pipeline reports a percentage and a status line before each segment;
//! the application owns presentation.

/// Receives synchronous progress reports from a run.
pub trait ProgressSink: Send + Sync {
    /// Report progress. `percent` is 0-100, non-decreasing within a run.
    fn report(&self, percent: u8, status: &str);
}

/// Discards all progress reports.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _percent: u8, _status: &str) {}
}

/// Any matching closure is a progress sink.
impl<F> ProgressSink for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, status: &str) {
        self(percent, status)
    }
}
