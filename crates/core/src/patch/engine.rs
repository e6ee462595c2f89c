//! Diff generation, application, and validation.

use tracing::debug;

use crate::errors::PatchError;
use crate::patch::ops::{DiffOperation, DiffResult};

/// Stateless patch engine.
pub struct PatchEngine;

impl PatchEngine {
    /// Compute a single-hunk diff turning `old_content` into `new_content`.
    ///
    /// The longest common prefix and suffix are stripped (the suffix search
    /// never reaches back into the prefix) and the differing middle becomes
    /// one `Insert`, `Delete`, or `Replace` at the prefix boundary. This
    /// describes one contiguous edit; it does not minimise edit distance
    /// across scattered changes.
    pub fn generate_diff(old_content: &str, new_content: &str) -> DiffResult {
        let diffs = if old_content == new_content {
            Vec::new()
        } else {
            vec![middle_operation(old_content, new_content)]
        };

        DiffResult {
            old_content: old_content.to_string(),
            new_content: new_content.to_string(),
            diffs,
        }
    }

    /// Apply `diffs` to `content`, left to right, each operation against the
    /// output of the previous one.
    ///
    /// Fails on the first operation whose position or span falls outside the
    /// content it is applied to. Nothing is clamped.
    pub fn apply_diff(content: &str, diffs: &[DiffOperation]) -> Result<String, PatchError> {
        let applied = diffs
            .iter()
            .enumerate()
            .try_fold(content.to_string(), |acc, (index, op)| {
                apply_operation(&acc, index, op)
            })?;
        debug!(ops = diffs.len(), "applied diff list");
        Ok(applied)
    }

    /// True iff applying `diffs` to `old_content` yields exactly
    /// `new_content`.
    ///
    /// A diff list that cannot be applied at all is reported as `false`, the
    /// same as one that applies to the wrong result.
    pub fn validate_diff(old_content: &str, new_content: &str, diffs: &[DiffOperation]) -> bool {
        match Self::apply_diff(old_content, diffs) {
            Ok(applied) => applied == new_content,
            Err(e) => {
                debug!(error = %e, "diff list does not apply");
                false
            }
        }
    }
}

/// Build the one operation covering the differing middle of two unequal
/// strings.
fn middle_operation(old_content: &str, new_content: &str) -> DiffOperation {
    let old: Vec<char> = old_content.chars().collect();
    let new: Vec<char> = new_content.chars().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old[prefix..old.len() - suffix];
    let new_middle: String = new[prefix..new.len() - suffix].iter().collect();

    if old_middle.is_empty() {
        DiffOperation::Insert {
            position: prefix,
            text: new_middle,
        }
    } else if new_middle.is_empty() {
        DiffOperation::Delete {
            position: prefix,
            length: old_middle.len(),
        }
    } else {
        DiffOperation::Replace {
            position: prefix,
            length: old_middle.len(),
            text: new_middle,
        }
    }
}

fn apply_operation(content: &str, index: usize, op: &DiffOperation) -> Result<String, PatchError> {
    let len = content.chars().count();
    let position = op.position();
    let length = op.removed_len();

    if position > len {
        return Err(PatchError::PositionOutOfBounds {
            index,
            position,
            len,
        });
    }
    let end = position
        .checked_add(length)
        .filter(|end| *end <= len)
        .ok_or(PatchError::RangeOutOfBounds {
            index,
            position,
            length,
            len,
        })?;

    let start_byte = byte_offset(content, position);
    let end_byte = byte_offset(content, end);
    let text = op.inserted_text();

    let mut out = String::with_capacity(content.len() - (end_byte - start_byte) + text.len());
    out.push_str(&content[..start_byte]);
    out.push_str(text);
    out.push_str(&content[end_byte..]);
    Ok(out)
}

/// Byte offset of the `chars`-th character; the string length when `chars`
/// is the character count.
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}
