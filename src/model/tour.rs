//! Tour types: the unit of guidance in Waypoint.

use serde::{Deserialize, Serialize};

/// An ordered walkthrough of a page.
///
/// Immutable once loaded into the engine. Step order is presentation order,
/// and saved progress indexes into it, so the sequence for a given tour id
/// must not change between a save and a resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<Step>,
}

/// One unit of a tour: a target plus explanatory content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stable identity, distinct from the step's position in the sequence.
    pub id: String,

    /// Opaque selector resolved against the live render surface.
    pub locator: String,

    pub title: String,
    pub body: String,
}
