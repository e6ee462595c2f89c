//! Regions produced by walking the base text during a three-way merge.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::merge::lines::join_lines;

/// A span where `current` and `incoming` both diverged from `base` and
/// ended up with different text.
///
/// `base_start..base_end` is the half-open base line range the region
/// covers. All three sides are stored line by line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRegion {
    pub base_start: usize,
    pub base_end: usize,
    pub base: Vec<String>,
    pub current: Vec<String>,
    pub incoming: Vec<String>,
}

impl ConflictRegion {
    pub fn base_text(&self) -> String {
        join_lines(&self.base)
    }

    pub fn current_text(&self) -> String {
        join_lines(&self.current)
    }

    pub fn incoming_text(&self) -> String {
        join_lines(&self.incoming)
    }
}

/// One step of the region walk, in base order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRegion {
    /// Neither side touched these base lines.
    Stable { base: Range<usize>, lines: Vec<String> },
    /// Only the human editor changed this span.
    CurrentOnly { base: Range<usize>, lines: Vec<String> },
    /// Only the agent changed this span.
    IncomingOnly { base: Range<usize>, lines: Vec<String> },
    /// Both sides made the identical change.
    Converged { base: Range<usize>, lines: Vec<String> },
    /// Both sides changed the span differently; resolved to `incoming`.
    Conflict(ConflictRegion),
}

impl MergeRegion {
    /// Base line range covered by the region.
    pub fn base_range(&self) -> Range<usize> {
        match self {
            Self::Stable { base, .. }
            | Self::CurrentOnly { base, .. }
            | Self::IncomingOnly { base, .. }
            | Self::Converged { base, .. } => base.clone(),
            Self::Conflict(c) => c.base_start..c.base_end,
        }
    }

    /// Lines this region contributes to the merged text.
    ///
    /// Conflicts contribute the incoming side.
    pub fn output(&self) -> &[String] {
        match self {
            Self::Stable { lines, .. }
            | Self::CurrentOnly { lines, .. }
            | Self::IncomingOnly { lines, .. }
            | Self::Converged { lines, .. } => lines,
            Self::Conflict(c) => &c.incoming,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Short name used in logs and annotations.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stable { .. } => "stable",
            Self::CurrentOnly { .. } => "current_only",
            Self::IncomingOnly { .. } => "incoming_only",
            Self::Converged { .. } => "converged",
            Self::Conflict(_) => "conflict",
        }
    }
}
