//! Context carry-over - a compact description of already-known entities.
//!
//! The block is rebuilt before each segment from the accumulated maps, so
//! it reflects every merge from prior segments. Feeding it back into the
//! next call biases the service toward reusing existing group names
//! instead of inventing duplicates for the same character or place.

use indexmap::IndexMap;

use crate::types::character::Character;
use crate::types::scene::Scene;

/// Build the carried-over context block.
///
/// At most `limit` entities per kind are listed; when capped, truncation
/// follows insertion order into the accumulated maps. Returns an empty
/// string when nothing is known yet. Bounding the list keeps the block
/// from crowding out the segment text itself.
pub fn summarize_known(
    characters: &IndexMap<String, Character>,
    scenes: &IndexMap<String, Scene>,
    limit: usize,
) -> String {
    if characters.is_empty() && scenes.is_empty() {
        return String::new();
    }

    let mut block = String::new();

    if !characters.is_empty() {
        block.push_str("Known characters (reuse these group names):\n");
        for character in characters.values().take(limit) {
            block.push_str(&format!(
                "- {} / {}",
                character.group_name, character.name
            ));
            if !character.aliases.is_empty() {
                let aliases: Vec<&str> =
                    character.aliases.iter().map(String::as_str).collect();
                block.push_str(&format!(" (aliases: {})", aliases.join(", ")));
            }
            block.push('\n');
        }
    }

    if !scenes.is_empty() {
        block.push_str("Known locations (reuse these group names):\n");
        for scene in scenes.values().take(limit) {
            block.push_str(&format!("- {} / {}\n", scene.group_name, scene.name));
        }
    }

    block
}
