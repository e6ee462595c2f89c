//! Three-way section merge.
//!
//! Two independent line diffs (base -> current, base -> incoming) are
//! computed, and their change hunks are walked together in base order. Each
//! stretch of base lines becomes a [`MergeRegion`]. When both sides changed
//! overlapping or touching base spans with different results, the region is
//! a conflict and the incoming side is emitted.

use tracing::debug;

use crate::merge::lines::{diff_lines, join_lines, split_lines, Hunk};
use crate::merge::region::{ConflictRegion, MergeRegion};
use crate::merge::result::MergeResult;

/// Which side of the merge a hunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Current,
    Incoming,
}

/// Stateless three-way merge engine.
pub struct Merger;

impl Merger {
    /// Merge a human edit (`current`) and an agent edit (`incoming`) made
    /// against the same `base`.
    ///
    /// Always returns merged text. When both sides changed the same lines
    /// differently, the incoming lines win and the overridden span is
    /// reported in `conflicts`.
    pub fn merge_section_content(base: &str, current: &str, incoming: &str) -> MergeResult {
        if current == base {
            debug!("current == base, incoming applies cleanly");
            return MergeResult::clean(incoming);
        }
        if incoming == base {
            debug!("incoming == base, keeping current");
            return MergeResult::clean(current);
        }
        if current == incoming {
            debug!("current == incoming, identical changes");
            return MergeResult::clean(current);
        }

        let regions = Self::regions(base, current, incoming);
        let result = MergeResult::from_regions(&regions);
        debug!(
            regions = regions.len(),
            conflicts = result.conflict_count(),
            "three-way merge complete"
        );
        result
    }

    /// Run the full region walk without the equality fast paths.
    pub fn regions(base: &str, current: &str, incoming: &str) -> Vec<MergeRegion> {
        let base_lines = split_lines(base);
        let current_lines = split_lines(current);
        let incoming_lines = split_lines(incoming);

        let current_hunks = diff_lines(&base_lines, &current_lines);
        let incoming_hunks = diff_lines(&base_lines, &incoming_lines);

        let mut tagged: Vec<(Side, &Hunk)> = current_hunks
            .iter()
            .map(|h| (Side::Current, h))
            .chain(incoming_hunks.iter().map(|h| (Side::Incoming, h)))
            .collect();
        tagged.sort_by_key(|(side, h)| (h.base.start, h.base.end, *side));

        let mut regions = Vec::new();
        let mut cursor = 0;
        let mut idx = 0;

        while idx < tagged.len() {
            let lo = tagged[idx].1.base.start;
            let mut hi = tagged[idx].1.base.end;
            let mut end = idx + 1;
            // Touching spans collide as well as overlapping ones.
            while end < tagged.len() && tagged[end].1.base.start <= hi {
                hi = hi.max(tagged[end].1.base.end);
                end += 1;
            }
            let cluster = &tagged[idx..end];

            if cursor < lo {
                regions.push(MergeRegion::Stable {
                    base: cursor..lo,
                    lines: owned(&base_lines[cursor..lo]),
                });
            }

            let ours: Vec<&Hunk> = side_hunks(cluster, Side::Current);
            let theirs: Vec<&Hunk> = side_hunks(cluster, Side::Incoming);

            let region = match (ours.is_empty(), theirs.is_empty()) {
                (false, true) => MergeRegion::CurrentOnly {
                    base: lo..hi,
                    lines: side_text(&ours, lo, hi, &base_lines, &current_lines),
                },
                (true, false) => MergeRegion::IncomingOnly {
                    base: lo..hi,
                    lines: side_text(&theirs, lo, hi, &base_lines, &incoming_lines),
                },
                _ => {
                    let current_text = side_text(&ours, lo, hi, &base_lines, &current_lines);
                    let incoming_text = side_text(&theirs, lo, hi, &base_lines, &incoming_lines);
                    if current_text == incoming_text {
                        MergeRegion::Converged {
                            base: lo..hi,
                            lines: incoming_text,
                        }
                    } else {
                        debug!(base_start = lo, base_end = hi, "conflicting region");
                        MergeRegion::Conflict(ConflictRegion {
                            base_start: lo,
                            base_end: hi,
                            base: owned(&base_lines[lo..hi]),
                            current: current_text,
                            incoming: incoming_text,
                        })
                    }
                }
            };
            regions.push(region);

            cursor = hi;
            idx = end;
        }

        if cursor < base_lines.len() {
            regions.push(MergeRegion::Stable {
                base: cursor..base_lines.len(),
                lines: owned(&base_lines[cursor..]),
            });
        }
        regions
    }

    /// Quick check: would merging these versions report no conflict?
    pub fn can_auto_merge(base: &str, current: &str, incoming: &str) -> bool {
        if current == base || incoming == base || current == incoming {
            return true;
        }
        !Self::regions(base, current, incoming)
            .iter()
            .any(MergeRegion::is_conflict)
    }

    /// Render the merge for human review.
    ///
    /// Clean regions appear as merged. Each conflict is shown with all three
    /// sides between diff3-style markers, so the reader can see what the
    /// incoming side overrode.
    pub fn annotate(base: &str, current: &str, incoming: &str) -> String {
        let mut output: Vec<&str> = Vec::new();
        let regions = Self::regions(base, current, incoming);

        for region in &regions {
            match region {
                MergeRegion::Conflict(c) => {
                    output.push("<<<<<<< current");
                    output.extend(c.current.iter().map(String::as_str));
                    output.push("||||||| base");
                    output.extend(c.base.iter().map(String::as_str));
                    output.push("=======");
                    output.extend(c.incoming.iter().map(String::as_str));
                    output.push(">>>>>>> incoming");
                }
                other => output.extend(other.output().iter().map(String::as_str)),
            }
        }

        join_lines(&output)
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

fn side_hunks<'a>(cluster: &[(Side, &'a Hunk)], side: Side) -> Vec<&'a Hunk> {
    cluster
        .iter()
        .filter(|(s, _)| *s == side)
        .map(|(_, h)| *h)
        .collect()
}

/// Text one side holds for base lines `lo..hi`.
///
/// Outside its own hunks a side is identical to base, so the span maps onto
/// the side's lines by extending the first and last hunk outward.
fn side_text(hunks: &[&Hunk], lo: usize, hi: usize, base: &[&str], side: &[&str]) -> Vec<String> {
    match (hunks.first(), hunks.last()) {
        (Some(first), Some(last)) => {
            let start = first.target.start - (first.base.start - lo);
            let end = last.target.end + (hi - last.base.end);
            owned(&side[start..end])
        }
        _ => owned(&base[lo..hi]),
    }
}
