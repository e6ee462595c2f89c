//! Human-readable merge summaries.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use draftsync_core::{ConflictRegion, MergeResult};

use crate::style;

/// Print a one-line verdict, plus a table of overridden spans when the merge
/// conflicted. Goes to stderr so merged text on stdout stays clean.
pub fn print_merge_summary(result: &MergeResult) {
    if !result.has_conflict {
        eprintln!("{}", style::success("Merged cleanly"));
        return;
    }

    eprintln!(
        "{}",
        style::warn(&format!(
            "{} conflicting region(s); incoming edits kept",
            result.conflict_count()
        ))
    );
    eprintln!("{}", conflict_table(&result.conflicts));
}

/// Table of conflicts: base span, the overridden current text, and the
/// incoming text that was kept.
pub fn conflict_table(conflicts: &[ConflictRegion]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Base lines", "Current (overridden)", "Incoming (kept)"]);

    for c in conflicts {
        table.add_row(vec![
            Cell::new(line_span(c)),
            Cell::new(c.current_text()),
            Cell::new(c.incoming_text()),
        ]);
    }
    table
}

/// 1-based, inclusive description of a conflict's base span.
pub fn line_span(conflict: &ConflictRegion) -> String {
    match (conflict.base_start, conflict.base_end) {
        (start, end) if start == end => format!("before {}", start + 1),
        (start, end) if end == start + 1 => format!("{}", start + 1),
        (start, end) => format!("{}-{}", start + 1, end),
    }
}
