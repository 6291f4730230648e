//! The extraction run - sequential per-segment orchestration.
//!
//! Segments are processed strictly in order: segment `i+1` never starts
//! before segment `i`'s merge completes, because the context block carried
//! into `i+1` must reflect `i`'s merged output for cross-segment identity
//! consistency. The only concurrency is between the run and its caller,
//! which may fire the cancellation token at any time.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::pipeline::chunk::chunk_text;
use crate::pipeline::context::summarize_known;
use crate::pipeline::merge::{EntityAccumulator, MergeMode};
use crate::pipeline::pacing::Pacer;
use crate::pipeline::parse::parse_segment_response;
use crate::pipeline::prompts::{format_extract_prompt, EXTRACT_ENTITIES_PROMPT};
use crate::pipeline::retry::with_retries;
use crate::traits::client::{ExtractionClient, SegmentRequest};
use crate::traits::progress::{NullProgress, ProgressSink};
use crate::types::character::Character;
use crate::types::config::PipelineConfig;
use crate::types::debug_log::DebugLogEntry;
use crate::types::scene::Scene;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every segment was attempted
    Completed,

    /// The cancellation signal was observed; later segments were never
    /// requested
    Cancelled,
}

/// Result of one extraction run.
///
/// Always carries everything merged from completed segments - a cancelled
/// run returns partial results rather than discarding them. The caller
/// owns merging these into its persisted document.
#[derive(Debug)]
pub struct RunOutcome {
    /// Consolidated characters, in first-seen order
    pub characters: Vec<Character>,

    /// Consolidated scenes, in first-seen order
    pub scenes: Vec<Scene>,

    /// One entry per attempted segment, in segment order
    pub debug_log: Vec<DebugLogEntry>,

    /// Whether the run completed or was cancelled
    pub status: RunStatus,
}

impl RunOutcome {
    /// Whether the run was stopped by the cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }
}

/// Per-run options.
pub struct RunOptions {
    /// Prompt template with `{context}` and `{segment}` placeholders;
    /// `None` uses the built-in default
    pub prompt_template: Option<String>,

    /// Scalar-merge behavior; the first pass is incremental
    pub merge_mode: MergeMode,

    /// Cancellation signal shared with the caller
    pub cancel: CancellationToken,

    /// Progress receiver
    pub progress: Arc<dyn ProgressSink>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            prompt_template: None,
            merge_mode: MergeMode::Incremental,
            cancel: CancellationToken::new(),
            progress: Arc::new(NullProgress),
        }
    }
}

impl RunOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an application-edited prompt template.
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// Run as an enrichment pass (incoming scalars overwrite).
    pub fn enriching(mut self) -> Self {
        self.merge_mode = MergeMode::Enrich;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }
}

/// Runs the extraction pipeline over one document.
pub struct ExtractionRun<C: ExtractionClient> {
    client: C,
    config: PipelineConfig,
}

impl<C: ExtractionClient> ExtractionRun<C> {
    /// Create a run with the default configuration.
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: PipelineConfig::default(),
        }
    }

    /// Create a run with a custom configuration.
    pub fn with_config(client: C, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Extract characters and scenes from `text`.
    ///
    /// Per-segment failures (exhausted retries, undecodable responses) are
    /// logged and skipped; they never abort the run. Only a configuration
    /// error - raised before any segment is processed - is an `Err`.
    /// Cancellation is an `Ok` outcome with [`RunStatus::Cancelled`] and
    /// whatever was merged up to that point.
    pub async fn run(&self, text: &str, options: RunOptions) -> Result<RunOutcome> {
        self.config.validate().map_err(ExtractionError::Config)?;

        let segments = chunk_text(text, self.config.profile.max_chunk_chars);
        let total = segments.len();
        let pacer = Pacer::new(self.config.pacing_delay());
        let template = options
            .prompt_template
            .as_deref()
            .unwrap_or(EXTRACT_ENTITIES_PROMPT);

        info!(
            segments = total,
            model = %self.config.profile.id,
            "starting extraction run"
        );

        let mut accumulated = EntityAccumulator::new();
        let mut debug_log = Vec::with_capacity(total);

        for (index, segment) in segments.iter().enumerate() {
            if options.cancel.is_cancelled() {
                info!(segment = index, "cancellation observed, returning partial results");
                return Ok(Self::outcome(accumulated, debug_log, RunStatus::Cancelled));
            }

            let percent = ((index as f64 / total as f64) * 100.0).round() as u8;
            options
                .progress
                .report(percent, &format!("extracting segment {}/{}", index + 1, total));

            // Reflects merges from all prior segments, not this one.
            let context = summarize_known(
                accumulated.characters(),
                accumulated.scenes(),
                self.config.context_entity_limit,
            );
            let prompt = format_extract_prompt(template, &context, segment);

            if pacer.acquire(&options.cancel).await.is_err() {
                info!(segment = index, "cancelled while pacing");
                return Ok(Self::outcome(accumulated, debug_log, RunStatus::Cancelled));
            }

            let request = SegmentRequest {
                prompt: prompt.clone(),
                context,
                segment: segment.clone(),
                cancel: options.cancel.clone(),
            };
            let client = &self.client;
            let call = with_retries(&self.config.retry, &options.cancel, || {
                let request = request.clone();
                async move { client.extract(request).await }
            })
            .await;

            let mut entry = match call {
                Ok(raw) => match parse_segment_response(&raw) {
                    Ok(payload) => {
                        debug!(
                            segment = index,
                            characters = payload.characters.len(),
                            scenes = payload.scenes.len(),
                            "segment decoded"
                        );
                        for candidate in payload.characters.clone() {
                            accumulated.merge_character(candidate, options.merge_mode);
                        }
                        for candidate in payload.scenes.clone() {
                            accumulated.merge_scene(candidate, options.merge_mode);
                        }
                        DebugLogEntry::success(index, raw, payload)
                    }
                    Err(e) => {
                        warn!(segment = index, error = %e, "response did not decode, skipping segment");
                        DebugLogEntry::failure(index, raw, e.to_string())
                    }
                },
                Err(ExtractionError::Cancelled) => {
                    info!(segment = index, "cancelled mid-call, discarding in-flight result");
                    return Ok(Self::outcome(accumulated, debug_log, RunStatus::Cancelled));
                }
                Err(e) => {
                    warn!(segment = index, error = %e, "segment failed, skipping");
                    DebugLogEntry::failure(index, String::new(), e.to_string())
                }
            };

            if index == 0 {
                entry = entry.with_prompt(prompt);
            }
            debug_log.push(entry);
        }

        options.progress.report(100, "extraction complete");
        info!(
            characters = accumulated.characters().len(),
            scenes = accumulated.scenes().len(),
            "extraction run complete"
        );

        Ok(Self::outcome(accumulated, debug_log, RunStatus::Completed))
    }

    fn outcome(
        accumulated: EntityAccumulator,
        debug_log: Vec<DebugLogEntry>,
        status: RunStatus,
    ) -> RunOutcome {
        let (characters, scenes) = accumulated.into_entities();
        RunOutcome {
            characters,
            scenes,
            debug_log,
            status,
        }
    }
}
