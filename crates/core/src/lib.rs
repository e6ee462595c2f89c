//! draftsync core library.
//!
//! This crate reconciles concurrent edits to document sections: a patch
//! engine for compact, replayable single-hunk diffs, a three-way merge
//! engine for human/agent edits made against a shared base, draft stores,
//! and the reconciliation service that ties them together.
//!
//! The patch and merge engines are pure functions over strings. They hold
//! no state and do no I/O, so they can be called from any number of threads
//! at once.

pub mod config;
pub mod errors;
pub mod merge;
pub mod patch;
pub mod reconcile;
pub mod store;

// Re-exports for convenience.
pub use config::AppConfig;
pub use merge::{ConflictRegion, MergeRegion, MergeResult, Merger};
pub use patch::{DiffList, DiffOperation, DiffResult, PatchEngine};
pub use reconcile::{ConflictReport, ReconcileRequest, Reconciler};
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore};
