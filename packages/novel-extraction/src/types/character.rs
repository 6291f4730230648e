//! Character records - the canonical output of character extraction.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Narrative weight of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterRole {
    /// Drives the main storyline
    Primary,

    /// Recurring with their own arc
    Secondary,

    /// Appears regularly but without an arc
    #[default]
    Supporting,

    /// Named extras, crowd-level presence
    Background,
}

impl CharacterRole {
    /// Parse a role label from a service response, case-insensitively.
    ///
    /// Unknown labels fall back to [`CharacterRole::Supporting`] rather
    /// than dropping the candidate.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "primary" | "protagonist" | "main" => CharacterRole::Primary,
            "secondary" => CharacterRole::Secondary,
            "supporting" => CharacterRole::Supporting,
            "background" | "minor" => CharacterRole::Background,
            _ => CharacterRole::Supporting,
        }
    }
}

/// What a character wears during one phase of the story.
///
/// Kept as an ordered list: the same character described differently in two
/// chapters is two entries, and both matter for visual continuity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingStyle {
    /// Story phase this outfit belongs to (chapter range, arc name, ...)
    #[serde(default)]
    pub phase: String,

    /// Free-text outfit description
    #[serde(default)]
    pub description: String,
}

/// A weapon or signature prop carried by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Weapon name
    #[serde(default)]
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// A consolidated character record.
///
/// `group_name` is the stable cross-form identity anchor: the same person
/// under different surface names across segments shares one `group_name`.
/// `name` is the surface form in the current context. The pair
/// (normalized group_name, normalized name) is unique within one
/// accumulated result set - it is the merge key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier, assigned on first insertion
    pub id: Uuid,

    /// Stable cross-form identity anchor
    pub group_name: String,

    /// Surface form in the current context
    pub name: String,

    /// Other surface forms, order-insensitive set
    #[serde(default)]
    pub aliases: IndexSet<String>,

    /// Narrative weight
    #[serde(default)]
    pub role: CharacterRole,

    /// Free text or a visual-age bucket
    #[serde(default)]
    pub age: String,

    /// Who this character is
    #[serde(default)]
    pub description: String,

    /// Free-text appearance notes
    #[serde(default)]
    pub visual_traits: String,

    /// Outfits by story phase, ordered, duplicates kept
    #[serde(default)]
    pub clothing_styles: Vec<ClothingStyle>,

    /// Weapons and signature props, ordered, duplicates kept
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}
