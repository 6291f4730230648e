//! Segmentation of the source document into bounded chunks.

/// Split `text` into ordered, contiguous, non-overlapping segments of at
/// most `max_chars` characters each.
///
/// The bound is in characters, not bytes - CJK prose would otherwise split
/// mid-codepoint. Concatenating the returned segments in order reproduces
/// the input exactly. Empty input yields no segments.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(text[start..offset].to_string());
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(text[start..].to_string());
    }

    chunks
}
