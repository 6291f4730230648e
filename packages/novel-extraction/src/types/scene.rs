//! Scene records - locations and recurring settings.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a scene is indoors or outdoors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SceneStructure {
    /// Indoors
    Interior,

    /// Outdoors
    #[default]
    Exterior,
}

impl SceneStructure {
    /// Parse a structure label from a service response, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "interior" | "indoor" | "indoors" => SceneStructure::Interior,
            _ => SceneStructure::Exterior,
        }
    }
}

/// How a scene functions in the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// A recurring home base the story keeps returning to
    #[default]
    CoreLocation,

    /// The site of a specific plot event
    PlotPoint,

    /// Passed through on the way somewhere else
    Transition,
}

impl SceneKind {
    /// Parse a kind label from a service response, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().replace('_', "-").as_str() {
            "core-location" | "core" => SceneKind::CoreLocation,
            "plot-point" | "plot" => SceneKind::PlotPoint,
            "transition" => SceneKind::Transition,
            _ => SceneKind::CoreLocation,
        }
    }
}

/// A consolidated scene record.
///
/// `group_name` anchors the site (a mountain, a palace); `name` is the
/// area or sub-location within it (a cave, a throne room). The pair
/// (normalized group_name, normalized name) is the merge key. `frequency`
/// counts how many segments mentioned the scene and only ever increases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique identifier, assigned on first insertion
    pub id: Uuid,

    /// Site identity anchor
    pub group_name: String,

    /// Area or sub-location within the site
    pub name: String,

    /// Other surface forms
    #[serde(default)]
    pub aliases: IndexSet<String>,

    /// What the place looks like; the first-seen description is
    /// authoritative across merges
    #[serde(default)]
    pub description: String,

    /// Indoors or outdoors
    #[serde(default)]
    pub structure: SceneStructure,

    /// Mood of the place
    #[serde(default)]
    pub atmosphere: String,

    /// Visual style notes
    #[serde(default)]
    pub style: String,

    /// How the scene functions in the story
    #[serde(default)]
    pub kind: SceneKind,

    /// Occurrence counter, monotonically increasing across merges
    pub frequency: u32,
}
