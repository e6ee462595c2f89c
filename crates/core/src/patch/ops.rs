//! Diff operation and result types.

use serde::{Deserialize, Serialize};

/// A single positional edit.
///
/// Serialized with an internal `type` tag so lists read naturally on the
/// wire, e.g. `{"type":"insert","position":5,"text":" world"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiffOperation {
    /// Insert `text` at `position`.
    Insert { position: usize, text: String },
    /// Remove `length` characters starting at `position`.
    Delete { position: usize, length: usize },
    /// Remove `length` characters starting at `position` and insert `text`
    /// in their place.
    Replace {
        position: usize,
        length: usize,
        text: String,
    },
}

impl DiffOperation {
    /// Character offset at which the operation applies.
    pub fn position(&self) -> usize {
        match self {
            Self::Insert { position, .. }
            | Self::Delete { position, .. }
            | Self::Replace { position, .. } => *position,
        }
    }

    /// Number of characters removed from the content.
    pub fn removed_len(&self) -> usize {
        match self {
            Self::Insert { .. } => 0,
            Self::Delete { length, .. } | Self::Replace { length, .. } => *length,
        }
    }

    /// Text written at `position` (empty for deletes).
    pub fn inserted_text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Replace { text, .. } => text,
            Self::Delete { .. } => "",
        }
    }
}

impl std::fmt::Display for DiffOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert { position, text } => {
                write!(f, "insert@{position} (+{})", text.chars().count())
            }
            Self::Delete { position, length } => write!(f, "delete@{position} (-{length})"),
            Self::Replace {
                position,
                length,
                text,
            } => write!(
                f,
                "replace@{position} (-{length} +{})",
                text.chars().count()
            ),
        }
    }
}

/// An ordered list of operations, applied one after another.
pub type DiffList = Vec<DiffOperation>;

/// Output of [`PatchEngine::generate_diff`](super::PatchEngine::generate_diff).
///
/// `diffs` is empty iff `old_content == new_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub old_content: String,
    pub new_content: String,
    pub diffs: DiffList,
}

impl DiffResult {
    /// True when the two contents were identical.
    pub fn is_unchanged(&self) -> bool {
        self.diffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let op = DiffOperation::Insert {
            position: 5,
            text: " world".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "insert", "position": 5, "text": " world"})
        );

        let result = DiffResult {
            old_content: "Hello world".into(),
            new_content: "Hello".into(),
            diffs: vec![DiffOperation::Delete {
                position: 5,
                length: 6,
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["oldContent"], "Hello world");
        assert_eq!(json["newContent"], "Hello");
        assert_eq!(json["diffs"][0]["type"], "delete");
        assert_eq!(json["diffs"][0]["length"], 6);
    }

    #[test]
    fn test_parse_replace() {
        let op: DiffOperation =
            serde_json::from_str(r#"{"type":"replace","position":6,"length":5,"text":"there"}"#)
                .unwrap();
        assert_eq!(op.position(), 6);
        assert_eq!(op.removed_len(), 5);
        assert_eq!(op.inserted_text(), "there");
    }

    #[test]
    fn test_display() {
        let op = DiffOperation::Replace {
            position: 6,
            length: 5,
            text: "there".into(),
        };
        assert_eq!(op.to_string(), "replace@6 (-5 +5)");
    }
}
