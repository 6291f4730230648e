//! Merge engine - folds per-segment candidates into canonical records.
//!
//! Entities are keyed by the normalized (group_name, name) pair so the
//! same character or scene reported under varying spacing, casing or
//! separators across segments lands on one record. The accumulated maps
//! are insertion-ordered; the context summarizer and the final result
//! both rely on that ordering.

use indexmap::{IndexMap, IndexSet};
use tracing::warn;
use uuid::Uuid;

use crate::types::candidate::{CandidateCharacter, CandidateScene};
use crate::types::character::{Character, CharacterRole};
use crate::types::scene::{Scene, SceneKind, SceneStructure};

/// How candidate scalars interact with already-accumulated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// First pass: scalar fields from later segments never replace
    /// non-empty accumulated values (empty ones may be filled).
    #[default]
    Incremental,

    /// Second pass: non-empty incoming scalars replace accumulated ones.
    Enrich,
}

/// Normalize one half of a merge key: strip whitespace, `-` and `_`,
/// lowercase the rest.
pub fn normalize_key_part(part: &str) -> String {
    part.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Build the merge key for a resolved (group, name) pair.
pub fn merge_key(group_name: &str, name: &str) -> String {
    format!("{}_{}", normalize_key_part(group_name), normalize_key_part(name))
}

/// Resolve the (group, name) pair for a candidate, substituting fallbacks
/// when one side is missing. A candidate with neither is unusable.
fn resolve_names(group_name: &str, name: &str) -> Option<(String, String)> {
    let group = group_name.trim();
    let name = name.trim();
    match (group.is_empty(), name.is_empty()) {
        (true, true) => None,
        (true, false) => Some((name.to_string(), name.to_string())),
        (false, true) => Some((group.to_string(), group.to_string())),
        (false, false) => Some((group.to_string(), name.to_string())),
    }
}

fn clean_aliases(aliases: &[String]) -> IndexSet<String> {
    aliases
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fill `target` from `incoming` according to the merge mode: incremental
/// merges only fill empty targets, enrichment replaces whenever the
/// incoming value is non-empty.
fn merge_scalar(target: &mut String, incoming: &str, mode: MergeMode) {
    let incoming = incoming.trim();
    if incoming.is_empty() {
        return;
    }
    if target.is_empty() || mode == MergeMode::Enrich {
        *target = incoming.to_string();
    }
}

/// Accumulated entities for one run.
///
/// Owned exclusively by one run for its duration; the runner folds each
/// segment's payload in sequence and takes the entities at the end.
#[derive(Debug, Default)]
pub struct EntityAccumulator {
    characters: IndexMap<String, Character>,
    scenes: IndexMap<String, Scene>,
}

impl EntityAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated characters, in insertion order.
    pub fn characters(&self) -> &IndexMap<String, Character> {
        &self.characters
    }

    /// The accumulated scenes, in insertion order.
    pub fn scenes(&self) -> &IndexMap<String, Scene> {
        &self.scenes
    }

    /// Fold one character candidate into the accumulated map.
    pub fn merge_character(&mut self, candidate: CandidateCharacter, mode: MergeMode) {
        let Some((group, name)) = resolve_names(&candidate.group_name, &candidate.name) else {
            warn!("dropping character candidate with no group name and no name");
            return;
        };
        let key = merge_key(&group, &name);
        let incoming_aliases = clean_aliases(&candidate.aliases);

        match self.characters.get_mut(&key) {
            Some(existing) => {
                // Alias sets union; appearance lists concatenate - repeated
                // outfit notes across segments are still informative.
                existing.aliases.extend(incoming_aliases);
                existing.clothing_styles.extend(candidate.clothing_styles);
                existing.weapons.extend(candidate.weapons);
                merge_scalar(&mut existing.age, &candidate.age, mode);
                merge_scalar(&mut existing.description, &candidate.description, mode);
                merge_scalar(&mut existing.visual_traits, &candidate.visual_traits, mode);
                if mode == MergeMode::Enrich && !candidate.role.trim().is_empty() {
                    existing.role = CharacterRole::from_label(&candidate.role);
                }
            }
            None => {
                let role = if candidate.role.trim().is_empty() {
                    CharacterRole::default()
                } else {
                    CharacterRole::from_label(&candidate.role)
                };
                self.characters.insert(
                    key,
                    Character {
                        id: Uuid::new_v4(),
                        group_name: group,
                        name,
                        aliases: incoming_aliases,
                        role,
                        age: candidate.age.trim().to_string(),
                        description: candidate.description.trim().to_string(),
                        visual_traits: candidate.visual_traits.trim().to_string(),
                        clothing_styles: candidate.clothing_styles,
                        weapons: candidate.weapons,
                    },
                );
            }
        }
    }

    /// Fold one scene candidate into the accumulated map.
    ///
    /// Unlike characters, an existing scene's aliases are retained as-is
    /// and its first-seen description stays authoritative; only the
    /// frequency grows (by the candidate's contributed count, default 1).
    pub fn merge_scene(&mut self, candidate: CandidateScene, mode: MergeMode) {
        let Some((group, name)) = resolve_names(&candidate.group_name, &candidate.name) else {
            warn!("dropping scene candidate with no group name and no name");
            return;
        };
        let key = merge_key(&group, &name);
        let contributed = candidate.frequency.unwrap_or(1).max(1);

        match self.scenes.get_mut(&key) {
            Some(existing) => {
                existing.frequency += contributed;
                merge_scalar(&mut existing.description, &candidate.description, mode);
                merge_scalar(&mut existing.atmosphere, &candidate.atmosphere, mode);
                merge_scalar(&mut existing.style, &candidate.style, mode);
                if mode == MergeMode::Enrich {
                    existing.aliases.extend(clean_aliases(&candidate.aliases));
                    if !candidate.structure.trim().is_empty() {
                        existing.structure = SceneStructure::from_label(&candidate.structure);
                    }
                    if !candidate.kind.trim().is_empty() {
                        existing.kind = SceneKind::from_label(&candidate.kind);
                    }
                }
            }
            None => {
                self.scenes.insert(
                    key,
                    Scene {
                        id: Uuid::new_v4(),
                        group_name: group,
                        name,
                        aliases: clean_aliases(&candidate.aliases),
                        description: candidate.description.trim().to_string(),
                        structure: SceneStructure::from_label(&candidate.structure),
                        atmosphere: candidate.atmosphere.trim().to_string(),
                        style: candidate.style.trim().to_string(),
                        kind: SceneKind::from_label(&candidate.kind),
                        frequency: contributed,
                    },
                );
            }
        }
    }

    /// Consume the accumulator, returning entities in insertion order.
    pub fn into_entities(self) -> (Vec<Character>, Vec<Scene>) {
        (
            self.characters.into_values().collect(),
            self.scenes.into_values().collect(),
        )
    }
}
