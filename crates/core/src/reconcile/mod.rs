//! Draft reconciliation service.
//!
//! [`Reconciler`] is the caller the merge and patch engines are built for:
//! it pulls the three snapshots of a section from a [`DraftStore`], merges
//! them, writes the result back, and produces an audit report whenever the
//! incoming side overrode a human edit. It also replays persisted patches,
//! validating them against the stored content first.

pub mod report;

pub use report::{content_hash, ConflictReport};

use tracing::{debug, info, warn};

use crate::errors::ReconcileError;
use crate::merge::{MergeResult, Merger};
use crate::patch::{DiffResult, PatchEngine};
use crate::store::DraftStore;

/// Ids of the drafts taking part in one section merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub base_id: String,
    pub current_id: String,
    pub incoming_id: String,
    /// Draft that receives the merged text.
    pub target_id: String,
}

impl ReconcileRequest {
    /// Merge into the `current` draft, the usual target for an editor buffer.
    pub fn new(
        base_id: impl Into<String>,
        current_id: impl Into<String>,
        incoming_id: impl Into<String>,
    ) -> Self {
        let current_id = current_id.into();
        Self {
            base_id: base_id.into(),
            target_id: current_id.clone(),
            current_id,
            incoming_id: incoming_id.into(),
        }
    }

    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = target_id.into();
        self
    }
}

/// Result of a successful reconcile.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub result: MergeResult,
    /// Present iff the merge reported conflicts.
    pub report: Option<ConflictReport>,
}

/// What happened when a persisted patch was replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The patch validated and its target content was written.
    Applied,
    /// The stored content already equals the patch's target.
    AlreadyApplied,
}

/// Orchestrates merges and patch replays over a draft store.
pub struct Reconciler<S> {
    store: S,
    annotate: bool,
}

impl<S: DraftStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            annotate: false,
        }
    }

    /// Attach a diff3-style rendering to every conflict report.
    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge the drafts named in `request` and write the merged text to its
    /// target.
    pub fn reconcile(&self, request: &ReconcileRequest) -> Result<ReconcileOutcome, ReconcileError> {
        let base = self.store.read(&request.base_id)?;
        let current = self.store.read(&request.current_id)?;
        let incoming = self.store.read(&request.incoming_id)?;
        debug!(
            base = %request.base_id,
            current = %request.current_id,
            incoming = %request.incoming_id,
            "loaded drafts for reconcile"
        );

        let result = Merger::merge_section_content(&base, &current, &incoming);
        self.store.write(&request.target_id, &result.merged)?;

        let report = if result.has_conflict {
            warn!(
                draft = %request.target_id,
                conflicts = result.conflict_count(),
                "incoming edit overrode conflicting human changes"
            );
            let mut report = ConflictReport::new(
                request.target_id.as_str(),
                &base,
                &current,
                &incoming,
                result.conflicts.clone(),
            );
            if self.annotate {
                report.annotated = Some(Merger::annotate(&base, &current, &incoming));
            }
            Some(report)
        } else {
            info!(draft = %request.target_id, "reconciled cleanly");
            None
        };

        Ok(ReconcileOutcome { result, report })
    }

    /// Replay a persisted patch onto draft `id`.
    ///
    /// The patch is only trusted if it still turns the stored content into
    /// its recorded `new_content`. A stale patch is rejected and nothing is
    /// written.
    pub fn apply_patch(&self, id: &str, patch: &DiffResult) -> Result<PatchOutcome, ReconcileError> {
        let stored = self.store.read(id)?;

        if stored == patch.new_content {
            debug!(id, "patch already applied");
            return Ok(PatchOutcome::AlreadyApplied);
        }
        if !PatchEngine::validate_diff(&stored, &patch.new_content, &patch.diffs) {
            warn!(id, ops = patch.diffs.len(), "rejecting stale patch");
            return Err(ReconcileError::StalePatch { id: id.to_string() });
        }

        let updated = PatchEngine::apply_diff(&stored, &patch.diffs)?;
        self.store.write(id, &updated)?;
        info!(id, ops = patch.diffs.len(), "patch applied");
        Ok(PatchOutcome::Applied)
    }
}
