//! Lifecycle and interaction events reported during playback.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The closed set of reportable event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TourStarted,
    TourCompleted,
    TourSkipped,
    StepViewed,
    StepNext,
    StepBack,
    TourError,
}

/// A reported event, stamped with tour identity, session identity, and
/// generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourEvent {
    pub tour_id: String,
    pub session_id: Uuid,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
    pub timestamp: Timestamp,
    /// Free-form context, e.g. `{"error": "element_not_found"}` or
    /// `{"permanent": true}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Per-event attributes supplied by the caller of
/// [`EventReporter::track`](crate::EventReporter::track).
#[derive(Debug, Clone, Default)]
pub struct EventAttributes {
    pub step_id: Option<String>,
    pub step_index: Option<usize>,
    pub metadata: Option<Map<String, Value>>,
}

impl EventAttributes {
    /// Attributes naming a step by id and position.
    pub fn step(id: impl Into<String>, index: usize) -> Self {
        Self {
            step_id: Some(id.into()),
            step_index: Some(index),
            metadata: None,
        }
    }

    /// Attributes naming a step position only.
    pub fn index(index: usize) -> Self {
        Self {
            step_id: None,
            step_index: Some(index),
            metadata: None,
        }
    }

    /// Attaches free-form metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
