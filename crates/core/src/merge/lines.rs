//! Line splitting and the two-way line diff used by the merger.
//!
//! Content is split on `'\n'` only. The empty string is a single empty line
//! and a trailing newline produces a trailing empty line, so [`join_lines`]
//! is the exact inverse of [`split_lines`]. Carriage returns stay part of
//! their line.

use std::ops::Range;

use diffy::DiffOptions;

/// Split content into lines.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Join lines back into content.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// A contiguous change between a base and a target sequence.
///
/// `base` lines were replaced by `target` lines. Either range may be empty
/// (pure insertion or pure deletion), never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub base: Range<usize>,
    pub target: Range<usize>,
}

/// Compute the changed hunks between `base` and `target`, in ascending base
/// order.
///
/// The alignment comes from diffy's Myers diff with zero context lines.
/// diffy sees newline-terminated lines, so every line gets a `'\n'` appended
/// before diffing; line `i` on either side keeps index `i`. Consecutive hunks
/// are always separated by at least one unchanged line.
pub fn diff_lines(base: &[&str], target: &[&str]) -> Vec<Hunk> {
    if base == target {
        return Vec::new();
    }

    let base_text = terminated(base);
    let target_text = terminated(target);
    let mut options = DiffOptions::new();
    options.set_context_len(0);
    let patch = options.create_patch(&base_text, &target_text);

    // Lines between hunks are unchanged, so the base and target offsets of a
    // hunk differ by the net line growth of every hunk before it.
    let mut growth: isize = 0;
    let mut hunks: Vec<Hunk> = Vec::with_capacity(patch.hunks().len());
    for hunk in patch.hunks() {
        let (old, new) = (hunk.old_range(), hunk.new_range());
        let (base_start, target_start) = if old.len() > 0 {
            let start = old.start() - 1;
            (start, start.saturating_add_signed(growth))
        } else {
            let start = new.start() - 1;
            (start.saturating_add_signed(-growth), start)
        };
        growth += new.len() as isize - old.len() as isize;

        let next = Hunk {
            base: base_start..base_start + old.len(),
            target: target_start..target_start + new.len(),
        };
        match hunks.last_mut() {
            Some(prev) if prev.base.end == next.base.start && prev.target.end == next.target.start => {
                prev.base.end = next.base.end;
                prev.target.end = next.target.end;
            }
            _ => hunks.push(next),
        }
    }
    hunks
}

/// Join `lines` with every line, including the last, terminated by `'\n'`.
fn terminated(lines: &[&str]) -> String {
    let mut out = join_lines(lines);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_join_round_trip() {
        for s in ["", "a", "a\n", "\n", "a\nb", "a\r\nb\r\n", "\n\n"] {
            assert_eq!(join_lines(&split_lines(s)), s);
        }
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }

    #[test]
    fn test_identical_has_no_hunks() {
        let lines = split_lines("a\nb\nc");
        assert!(diff_lines(&lines, &lines).is_empty());
    }

    #[test]
    fn test_single_replacement() {
        let base = split_lines("a\nb\nc");
        let target = split_lines("a\nB\nc");
        assert_eq!(
            diff_lines(&base, &target),
            vec![Hunk {
                base: 1..2,
                target: 1..2
            }]
        );
    }

    #[test]
    fn test_insertion_and_deletion() {
        let base = split_lines("a\nb\nc\nd");
        let target = split_lines("a\nx\nb\nc");
        assert_eq!(
            diff_lines(&base, &target),
            vec![
                Hunk {
                    base: 1..1,
                    target: 1..2
                },
                Hunk {
                    base: 3..4,
                    target: 4..4
                },
            ]
        );
    }

    #[test]
    fn test_scattered_changes() {
        let base = split_lines("1\n2\n3\n4\n5");
        let target = split_lines("1\ntwo\n3\nfour\n5");
        assert_eq!(
            diff_lines(&base, &target),
            vec![
                Hunk {
                    base: 1..2,
                    target: 1..2
                },
                Hunk {
                    base: 3..4,
                    target: 3..4
                },
            ]
        );
    }

    #[test]
    fn test_everything_replaced() {
        let base = split_lines("a\nb");
        let target = split_lines("x\ny\nz");
        assert_eq!(
            diff_lines(&base, &target),
            vec![Hunk {
                base: 0..2,
                target: 0..3
            }]
        );
    }

    #[test]
    fn test_hunks_reconstruct_target() {
        let base = split_lines("title\n\nalpha\nbeta\ngamma\ndelta\n");
        let target = split_lines("title\n\nALPHA\nbeta\ndelta\nepsilon\n");
        let hunks = diff_lines(&base, &target);

        let mut rebuilt: Vec<&str> = Vec::new();
        let mut cursor = 0;
        for hunk in &hunks {
            rebuilt.extend_from_slice(&base[cursor..hunk.base.start]);
            rebuilt.extend_from_slice(&target[hunk.target.clone()]);
            cursor = hunk.base.end;
        }
        rebuilt.extend_from_slice(&base[cursor..]);
        assert_eq!(rebuilt, target);
    }

    #[test]
    fn test_empty_and_trailing_lines() {
        let base = split_lines("");
        let target = split_lines("a\n");
        assert_eq!(
            diff_lines(&base, &target),
            vec![Hunk {
                base: 0..0,
                target: 0..1
            }]
        );

        let base = split_lines("a\nb\n");
        let target = split_lines("a\nb");
        assert_eq!(
            diff_lines(&base, &target),
            vec![Hunk {
                base: 2..3,
                target: 2..2
            }]
        );
    }

    #[test]
    fn test_long_section_with_few_edits() {
        let base_owned: Vec<String> = (0..20_000).map(|i| format!("line {i}")).collect();
        let mut target_owned = base_owned.clone();
        target_owned[100] = "edited".into();
        target_owned.insert(15_000, "inserted".into());

        let base: Vec<&str> = base_owned.iter().map(String::as_str).collect();
        let target: Vec<&str> = target_owned.iter().map(String::as_str).collect();
        assert_eq!(
            diff_lines(&base, &target),
            vec![
                Hunk {
                    base: 100..101,
                    target: 100..101
                },
                Hunk {
                    base: 15_000..15_000,
                    target: 15_000..15_001
                },
            ]
        );
    }
}
