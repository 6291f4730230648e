//! Decode service responses into segment payloads.
//!
//! The decode is schema-validated: it produces either a typed
//! [`SegmentPayload`] or a classified [`ExtractionError::SchemaParse`],
//! never a partially-typed value.

use crate::error::{ExtractionError, Result};
use crate::types::candidate::SegmentPayload;

/// Parse a raw response body into a segment payload.
///
/// Models wrap JSON in markdown code fences often enough that the fence
/// is stripped before decoding.
pub fn parse_segment_response(raw: &str) -> Result<SegmentPayload> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| ExtractionError::SchemaParse(e.to_string()))
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") up to the first newline.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{
            "characters": [
                {"group_name": "唐僧", "name": "三藏", "aliases": ["唐僧"]}
            ],
            "scenes": [
                {"group_name": "长安", "name": "皇宫", "structure": "interior"}
            ]
        }"#;

        let payload = parse_segment_response(raw).unwrap();
        assert_eq!(payload.characters.len(), 1);
        assert_eq!(payload.scenes.len(), 1);
        assert_eq!(payload.characters[0].group_name, "唐僧");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"characters\": [{\"name\": \"悟空\"}], \"scenes\": []}\n```";
        let payload = parse_segment_response(raw).unwrap();
        assert_eq!(payload.characters.len(), 1);
    }

    #[test]
    fn test_parse_fence_without_language() {
        let raw = "```\n{\"characters\": [], \"scenes\": []}\n```";
        let payload = parse_segment_response(raw).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let payload = parse_segment_response("{}").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_non_json_is_schema_parse_error() {
        let result = parse_segment_response("I could not find any characters.");
        assert!(matches!(result, Err(ExtractionError::SchemaParse(_))));
    }

    #[test]
    fn test_wrong_shape_is_schema_parse_error() {
        let result = parse_segment_response(r#"{"characters": "none"}"#);
        assert!(matches!(result, Err(ExtractionError::SchemaParse(_))));
    }
}
