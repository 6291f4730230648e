//! Prompt templates for the extraction service.
//!
//! Templates use `{context}` and `{segment}` placeholders. Applications
//! may pass an edited template through
//! [`RunOptions`](crate::pipeline::runner::RunOptions); the default below
//! is used otherwise.

/// Default prompt for per-segment character and scene extraction.
pub const EXTRACT_ENTITIES_PROMPT: &str = r#"You are analyzing one segment of a long novel. Extract every character and location that appears in this segment.

{context}

Rules:
- group_name is the stable identity of a character or site. If an entity in this segment matches a known one under a different surface name, reuse the known group_name instead of inventing a new one.
- name is the surface form used in this segment.
- List alternate names, titles and epithets in aliases.
- role is one of: primary, secondary, supporting, background.
- structure is one of: interior, exterior.
- kind is one of: core-location, plot-point, transition.
- Describe appearance (visual_traits), outfits (clothing_styles with the story phase they belong to) and weapons only from what this segment says.
- Omit entities that are merely mentioned in passing with no identity of their own.

Segment:
---
{segment}
---

Output JSON only, no markdown fences, in exactly this shape:
{
  "characters": [
    {
      "group_name": "...",
      "name": "...",
      "aliases": ["..."],
      "role": "supporting",
      "age": "...",
      "description": "...",
      "visual_traits": "...",
      "clothing_styles": [{"phase": "...", "description": "..."}],
      "weapons": [{"name": "...", "description": "..."}]
    }
  ],
  "scenes": [
    {
      "group_name": "...",
      "name": "...",
      "aliases": ["..."],
      "description": "...",
      "structure": "exterior",
      "atmosphere": "...",
      "style": "...",
      "kind": "core-location"
    }
  ]
}"#;

/// Substitute the context block and segment text into a template.
///
/// An empty context substitutes to an empty line rather than an empty
/// header, so the first segment's prompt carries no stale scaffolding.
pub fn format_extract_prompt(template: &str, context: &str, segment: &str) -> String {
    template
        .replace("{context}", context.trim_end())
        .replace("{segment}", segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_substitutes_both_placeholders() {
        let prompt = format_extract_prompt(
            EXTRACT_ENTITIES_PROMPT,
            "Known characters (reuse these group names):\n- 唐僧 / 三藏\n",
            "却说三藏行至山前。",
        );

        assert!(prompt.contains("唐僧 / 三藏"));
        assert!(prompt.contains("却说三藏行至山前。"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{segment}"));
    }

    #[test]
    fn test_custom_template() {
        let prompt = format_extract_prompt("A {context} B {segment} C", "ctx", "seg");
        assert_eq!(prompt, "A ctx B seg C");
    }
}
