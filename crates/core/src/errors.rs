//! Error types for the draftsync core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.
//!
//! The three-way merge engine has no error type: every input triple yields a
//! merge result, and conflicts are reported as data.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Patch errors
// ---------------------------------------------------------------------------

/// Errors raised while applying a diff list.
///
/// `index` is the position of the failing operation within the list and
/// `len` is the character length of the content at the moment that
/// operation was applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// An operation starts past the end of the content.
    #[error("diff operation {index}: position {position} is beyond content length {len}")]
    PositionOutOfBounds {
        index: usize,
        position: usize,
        len: usize,
    },

    /// A delete/replace span runs past the end of the content.
    #[error(
        "diff operation {index}: range {position}..{position}+{length} exceeds content length {len}"
    )]
    RangeOutOfBounds {
        index: usize,
        position: usize,
        length: usize,
        len: usize,
    },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from a draft content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No draft exists under the given id.
    #[error("draft not found: {0}")]
    NotFound(String),

    /// The id cannot be used as a draft key.
    #[error("invalid draft id '{id}': {detail}")]
    InvalidId { id: String, detail: String },

    /// Generic I/O wrapper.
    #[error("draft store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Reconcile errors
// ---------------------------------------------------------------------------

/// Errors from the reconciliation service.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Reading or writing a draft failed.
    #[error("reconcile store error: {0}")]
    Store(#[from] StoreError),

    /// A patch could not be applied to the stored content.
    #[error("reconcile patch error: {0}")]
    Patch(#[from] PatchError),

    /// A persisted patch no longer transforms the stored content into its
    /// recorded target.
    #[error("stale patch for draft '{id}': stored content no longer matches")]
    StalePatch { id: String },

    /// A conflict report could not be serialized or written.
    #[error("conflict report error: {0}")]
    Report(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
