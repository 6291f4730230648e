//! Incremental Narrative Entity Extraction Library
//!
//! Ingests a long document (typically long-form fiction), splits it into
//! bounded segments, and calls an external text-understanding service per
//! segment to extract structured entities - characters and scenes -
//! incrementally merging results so the same entity recognized under
//! different surface names across segments lands on one canonical record.
//!
//! # Design Philosophy
//!
//! - The pipeline owns the mechanics: chunking, context carry-over,
//!   retry/backoff, pacing, merging, cancellation, debug recording.
//! - The application owns the semantics: prompt wording, persistence,
//!   presentation, and which service answers the calls.
//! - Per-segment failures are logged and skipped, never fatal - a run
//!   always returns whatever it accumulated.
//!
//! # Usage
//!
//! ```rust,ignore
//! use novel_extraction::{ExtractionRun, RunOptions};
//! use novel_extraction::testing::MockExtractor;
//!
//! let client = MockExtractor::new();
//! let run = ExtractionRun::new(client);
//!
//! let outcome = run.run(&full_text, RunOptions::new()).await?;
//! println!("{} characters, {} scenes", outcome.characters.len(), outcome.scenes.len());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (ExtractionClient, ProgressSink)
//! - [`types`] - Domain types (Character, Scene, chapters, config, debug log)
//! - [`pipeline`] - The per-segment extraction pipeline
//! - [`chapters`] - Chapter splitting by heading recognition
//! - [`normalize`] - Alias-to-canonical-tag text rewriting
//! - [`testing`] - Mock client for tests

pub mod chapters;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "gemini")]
pub mod ai;

// Re-export core types at crate root
pub use error::{ExtractionError, Result};
pub use traits::{
    client::{ClientError, ClientErrorKind, ExtractionClient, SegmentRequest},
    progress::{NullProgress, ProgressSink},
};
pub use types::{
    candidate::{CandidateCharacter, CandidateScene, SegmentPayload},
    chapter::ChapterMetadata,
    character::{Character, CharacterRole, ClothingStyle, Weapon},
    config::{ModelProfile, PipelineConfig, RetryConfig},
    debug_log::DebugLogEntry,
    scene::{Scene, SceneKind, SceneStructure},
};

// Re-export pipeline components
pub use pipeline::{
    chunk_text, format_extract_prompt, merge_key, normalize_key_part, parse_segment_response,
    summarize_known, with_retries, EntityAccumulator, ExtractionRun, MergeMode, Pacer,
    RunCoordinator, RunOptions, RunOutcome, RunSlot, RunStatus, EXTRACT_ENTITIES_PROMPT,
};

// Re-export the independent text utilities
pub use chapters::split_chapters;
pub use normalize::normalize_entities;

// Re-export testing utilities
pub use testing::MockExtractor;

#[cfg(feature = "gemini")]
pub use ai::GeminiClient;
