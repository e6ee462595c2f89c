//! The value returned by a section merge.

use serde::{Deserialize, Serialize};

use crate::merge::lines::join_lines;
use crate::merge::region::{ConflictRegion, MergeRegion};

/// Outcome of [`Merger::merge_section_content`](super::Merger::merge_section_content).
///
/// `merged` always holds usable text. `has_conflict` is true iff
/// `conflicts` is non-empty; on the wire `conflicts` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub merged: String,
    pub has_conflict: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictRegion>,
}

impl MergeResult {
    /// A conflict-free result.
    pub fn clean(merged: impl Into<String>) -> Self {
        Self {
            merged: merged.into(),
            has_conflict: false,
            conflicts: Vec::new(),
        }
    }

    /// Assemble the merged text and conflict list from a region walk.
    pub fn from_regions(regions: &[MergeRegion]) -> Self {
        let lines: Vec<&str> = regions
            .iter()
            .flat_map(|r| r.output().iter().map(String::as_str))
            .collect();
        let conflicts: Vec<ConflictRegion> = regions
            .iter()
            .filter_map(|r| match r {
                MergeRegion::Conflict(c) => Some(c.clone()),
                _ => None,
            })
            .collect();

        Self {
            merged: join_lines(&lines),
            has_conflict: !conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_omits_conflicts_on_wire() {
        let json = serde_json::to_value(MergeResult::clean("text")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"merged": "text", "hasConflict": false})
        );

        let parsed: MergeResult =
            serde_json::from_str(r#"{"merged":"text","hasConflict":false}"#).unwrap();
        assert_eq!(parsed, MergeResult::clean("text"));
    }

    #[test]
    fn test_from_regions() {
        let regions = vec![
            MergeRegion::Stable {
                base: 0..1,
                lines: vec!["keep".into()],
            },
            MergeRegion::Conflict(ConflictRegion {
                base_start: 1,
                base_end: 2,
                base: vec!["old".into()],
                current: vec!["mine".into()],
                incoming: vec!["theirs".into()],
            }),
            MergeRegion::CurrentOnly {
                base: 2..3,
                lines: vec![],
            },
        ];
        let result = MergeResult::from_regions(&regions);
        assert_eq!(result.merged, "keep\ntheirs");
        assert!(result.has_conflict);
        assert_eq!(result.conflict_count(), 1);
    }
}
