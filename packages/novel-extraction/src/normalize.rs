//! Entity normalization - rewrite prose with canonical entity tags.
//!
//! Every known surface form (primary name or alias) is replaced with the
//! `group_name` + `_` + `name` tag of its entity, longest surface form
//! first, so a longer alias is consumed before any shorter alias that is
//! a substring of it.
//!
//! This is a best-effort heuristic, not a tokenizer: substitutions are
//! applied sequentially over the evolving string, so overlapping or
//! nested aliases can still double-substitute in pathological alias sets.
//! Callers that need exact rewrites must de-overlap their aliases.

use crate::types::character::Character;
use crate::types::scene::Scene;

/// One pending substitution.
struct Substitution {
    key: String,
    replacement: String,
    key_chars: usize,
}

fn push_entity_keys(
    substitutions: &mut Vec<Substitution>,
    group_name: &str,
    name: &str,
    aliases: impl Iterator<Item = String>,
) {
    let replacement = format!("{}_{}", group_name, name);

    let mut push = |key: &str| {
        let key = key.trim();
        if key.is_empty() || key == replacement {
            return;
        }
        substitutions.push(Substitution {
            key: key.to_string(),
            replacement: replacement.clone(),
            key_chars: key.chars().count(),
        });
    };

    push(name);
    for alias in aliases {
        if alias.chars().count() > 1 {
            push(&alias);
        }
    }
}

/// Rewrite `text`, substituting every known character and scene surface
/// form with its canonical `group_name_name` tag.
///
/// Primary names are always candidates; aliases only when longer than one
/// character (single-character aliases would shred ordinary prose).
/// Substitution order is key length descending, each applied as a global
/// literal replacement over the current state of the string.
pub fn normalize_entities(text: &str, characters: &[Character], scenes: &[Scene]) -> String {
    let mut substitutions = Vec::new();

    for character in characters {
        push_entity_keys(
            &mut substitutions,
            &character.group_name,
            &character.name,
            character.aliases.iter().cloned(),
        );
    }
    for scene in scenes {
        push_entity_keys(
            &mut substitutions,
            &scene.group_name,
            &scene.name,
            scene.aliases.iter().cloned(),
        );
    }

    // Longest key first; stable sort keeps entity order for equal lengths.
    substitutions.sort_by(|a, b| b.key_chars.cmp(&a.key_chars));

    let mut result = text.to_string();
    for substitution in &substitutions {
        if result.contains(&substitution.key) {
            result = result.replace(&substitution.key, &substitution.replacement);
        }
    }
    result
}
