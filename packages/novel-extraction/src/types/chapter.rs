//! Chapter records produced by the chapter splitter.

use serde::{Deserialize, Serialize};

/// One chapter located in the source text.
///
/// Chapters are emitted in document order. When headings are detected they
/// are contiguous and exhaustive - every character of the input belongs to
/// exactly one chapter. When no headings are found, a single full-span
/// fallback chapter is emitted instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMetadata {
    /// The heading line (or a fallback title)
    pub title: String,

    /// Short description of the chapter content
    pub summary: String,

    /// A short excerpt usable to re-locate the chapter start in the
    /// original text
    pub anchor_line: String,
}
