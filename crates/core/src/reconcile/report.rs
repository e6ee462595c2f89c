//! Audit records for merges that overrode human edits.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::ReconcileError;
use crate::merge::ConflictRegion;

/// Hex-encoded SHA-256 of `text`.
///
/// Used to identify the exact snapshots a merge was computed from, and as a
/// memoization key for callers that cache merges.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Record of a conflicted merge, suitable for showing a reviewer what the
/// incoming side overrode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Draft the merged text was written to.
    pub target_id: String,
    pub base_hash: String,
    pub current_hash: String,
    pub incoming_hash: String,
    pub conflicts: Vec<ConflictRegion>,
    /// diff3-style rendering, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated: Option<String>,
}

impl ConflictReport {
    /// Create a report with a fresh UUID and the current time.
    pub fn new(
        target_id: impl Into<String>,
        base: &str,
        current: &str,
        incoming: &str,
        conflicts: Vec<ConflictRegion>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            target_id: target_id.into(),
            base_hash: content_hash(base),
            current_hash: content_hash(current),
            incoming_hash: content_hash(incoming),
            conflicts,
            annotated: None,
        }
    }

    /// Write the report as pretty JSON to `<dir>/<id>.json`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ReconcileError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReconcileError::Report(e.to_string()))?;
        std::fs::create_dir_all(dir)
            .map_err(|e| ReconcileError::Report(format!("{}: {e}", dir.display())))?;
        let path = dir.join(format!("{}.json", self.id));
        std::fs::write(&path, json)
            .map_err(|e| ReconcileError::Report(format!("{}: {e}", path.display())))?;
        Ok(path)
    }
}
