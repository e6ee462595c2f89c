//! Three-way merge of concurrently edited document sections.
//!
//! A section has a common ancestor (`base`), the human editor's version
//! (`current`), and the agent's proposed version (`incoming`). The merger
//! keeps every non-overlapping change from both sides. Where both sides
//! changed the same lines differently, the incoming side wins and the
//! overridden span is reported as a [`ConflictRegion`].

pub mod lines;
pub mod merger;
pub mod region;
pub mod result;

pub use merger::Merger;
pub use region::{ConflictRegion, MergeRegion};
pub use result::MergeResult;
