//! Patch engine: compact, replayable single-hunk text diffs.
//!
//! A [`DiffList`] is applied **sequentially**. Each operation's `position`
//! refers to the content produced by the previous operation in the list, not
//! to the original text. Callers building multi-operation lists by hand must
//! compute later positions against the document as it looks *after* the
//! earlier operations have been applied:
//!
//! ```
//! use draftsync_core::patch::{DiffOperation, PatchEngine};
//!
//! let diffs = vec![
//!     // "Hello world" -> "Howdy world"
//!     DiffOperation::Replace { position: 0, length: 5, text: "Howdy".into() },
//!     // position 5 is measured against "Howdy world"
//!     DiffOperation::Delete { position: 5, length: 6 },
//! ];
//! assert_eq!(PatchEngine::apply_diff("Hello world", &diffs).unwrap(), "Howdy");
//! ```
//!
//! Positions and lengths count Unicode scalar values (`char`s), never bytes.

pub mod engine;
pub mod ops;

pub use engine::PatchEngine;
pub use ops::{DiffList, DiffOperation, DiffResult};
