//! The persisted progress record, one per tour identity.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// What the store remembers about a tour between sessions.
///
/// Exactly one variant is valid at a time; writing either replaces the other.
/// Serialized untagged so the stored shapes are exactly
/// `{"completed": true, "timestamp": ...}` and
/// `{"stepIndex": n, "timestamp": ...}`. The `timestamp` is the write time,
/// used solely for expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressRecord {
    /// The tour was finished or permanently dismissed; it never auto-starts
    /// again.
    Completed {
        completed: bool,
        timestamp: Timestamp,
    },

    /// A resumable position in the step sequence.
    #[serde(rename_all = "camelCase")]
    InProgress {
        step_index: usize,
        timestamp: Timestamp,
    },
}

impl ProgressRecord {
    /// The write time of either variant.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Completed { timestamp, .. } | Self::InProgress { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_round_trips_with_camel_case_key() {
        let record = ProgressRecord::InProgress {
            step_index: 3,
            timestamp: Timestamp::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"stepIndex\":3"), "{json}");

        let parsed: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn completed_shape_parses_as_completed() {
        let parsed: ProgressRecord =
            serde_json::from_str(r#"{"completed": true, "timestamp": "2026-01-01T00:00:00Z"}"#)
                .unwrap();
        assert!(matches!(parsed, ProgressRecord::Completed { completed: true, .. }));
    }

    #[test]
    fn step_index_shape_parses_as_in_progress() {
        let parsed: ProgressRecord =
            serde_json::from_str(r#"{"stepIndex": 2, "timestamp": "2026-01-01T00:00:00Z"}"#)
                .unwrap();
        assert!(matches!(parsed, ProgressRecord::InProgress { step_index: 2, .. }));
    }
}
