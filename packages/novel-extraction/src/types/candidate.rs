//! Candidate entities - the lenient shapes decoded from service responses.
//!
//! The service is prompted for a specific JSON shape but responses drift:
//! fields go missing, labels change case, counts disappear. Candidates
//! absorb that drift with defaults; the merge engine resolves them into
//! canonical records or drops the unusable ones.

use serde::{Deserialize, Serialize};

use crate::types::character::{ClothingStyle, Weapon};

/// A character as reported by the service for one segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateCharacter {
    /// Cross-form identity anchor; may be missing
    #[serde(default, alias = "groupName")]
    pub group_name: String,

    /// Surface form; may be missing
    #[serde(default)]
    pub name: String,

    /// Other surface forms
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Role label, parsed leniently
    #[serde(default)]
    pub role: String,

    /// Free-text age
    #[serde(default)]
    pub age: String,

    /// Who this character is
    #[serde(default)]
    pub description: String,

    /// Appearance notes
    #[serde(default, alias = "visualTraits")]
    pub visual_traits: String,

    /// Outfits by story phase
    #[serde(default, alias = "clothingStyles")]
    pub clothing_styles: Vec<ClothingStyle>,

    /// Weapons and signature props
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}

/// A scene as reported by the service for one segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateScene {
    /// Site identity anchor; may be missing
    #[serde(default, alias = "groupName")]
    pub group_name: String,

    /// Area or sub-location; may be missing
    #[serde(default)]
    pub name: String,

    /// Other surface forms
    #[serde(default)]
    pub aliases: Vec<String>,

    /// What the place looks like
    #[serde(default)]
    pub description: String,

    /// Structure label, parsed leniently
    #[serde(default)]
    pub structure: String,

    /// Mood of the place
    #[serde(default)]
    pub atmosphere: String,

    /// Visual style notes
    #[serde(default)]
    pub style: String,

    /// Kind label, parsed leniently
    #[serde(default, alias = "type")]
    pub kind: String,

    /// Contributed occurrence count; defaults to 1 when absent
    #[serde(default)]
    pub frequency: Option<u32>,
}

/// Everything the service reported for one segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentPayload {
    /// Character candidates
    #[serde(default)]
    pub characters: Vec<CandidateCharacter>,

    /// Scene candidates
    #[serde(default)]
    pub scenes: Vec<CandidateScene>,
}

impl SegmentPayload {
    /// Whether the payload carries no candidates at all.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.scenes.is_empty()
    }
}
