//! Reconciles a line level chunk sequence into paired left/right rows.
//!
//! A removed chunk directly followed by an added chunk is a block of edits:
//! its lines are paired by position into modification rows, and any lines
//! left over on either side become plain removals or additions. Both sides
//! keep their own line counter, seeded with the configured offset.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{
    DiffInput, DiffType, LineFragment, LineId, LineRow, LineValue, Result, Side, SideInfo,
};
use crate::infra::config::DiffOptions;
use crate::infra::diff::{ChangeChunk, CompareMode, chunks_for, compute_word_diff};

/// Reconciled rows plus the indices of the rows that count as changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LineInformation {
    pub rows: Vec<LineRow>,
    /// Ascending, without duplicates.
    pub diff_lines: Vec<usize>,
}

/// Diffs two inputs and reconciles the result into rows.
pub fn compute_line_information(
    old: &DiffInput,
    new: &DiffInput,
    options: &DiffOptions,
) -> Result<LineInformation> {
    let chunks = chunks_for(old, new)?;
    Ok(reconcile_chunks(&chunks, options))
}

/// Reconciles an already computed chunk sequence.
pub fn reconcile_chunks(chunks: &[ChangeChunk], options: &DiffOptions) -> LineInformation {
    let word_diff = (!options.disable_word_diff).then_some(&options.compare_mode);
    let mut reconciler = Reconciler {
        left: options.lines_offset,
        right: options.lines_offset,
        word_diff,
        always_show: options.always_show_lines.iter().copied().collect(),
        info: LineInformation::default(),
    };

    let mut i = 0;
    while i < chunks.len() {
        let chunk = &chunks[i];
        if chunk.is_unchanged() {
            for line in chunk.lines() {
                reconciler.unchanged(line);
            }
        } else if chunk.removed {
            let removed = chunk.lines();
            let added = match chunks.get(i + 1) {
                Some(next) if next.added && !next.removed => {
                    i += 1;
                    next.lines()
                }
                _ => Vec::new(),
            };

            for (index, line) in removed.iter().enumerate() {
                match added.get(index) {
                    Some(replacement) => reconciler.modified(line, replacement),
                    None => reconciler.removed(line),
                }
            }
            for line in added.iter().skip(removed.len()) {
                reconciler.added(line);
            }
        } else {
            for line in chunk.lines() {
                reconciler.added(line);
            }
        }
        i += 1;
    }

    let info = reconciler.info;
    debug!(
        "reconciled {} chunks into {} rows ({} diff lines)",
        chunks.len(),
        info.rows.len(),
        info.diff_lines.len()
    );
    info
}

struct Reconciler<'a> {
    left: usize,
    right: usize,
    word_diff: Option<&'a CompareMode>,
    always_show: HashSet<LineId>,
    info: LineInformation,
}

/// Removed empty lines are shown as a single space so they do not render
/// as a missing side.
fn removed_text(line: &str) -> &str {
    if line.is_empty() { " " } else { line }
}

impl Reconciler<'_> {
    fn unchanged(&mut self, line: &str) {
        self.left += 1;
        self.right += 1;
        self.push(
            LineRow {
                left: SideInfo::new(self.left, DiffType::Default, line),
                right: SideInfo::new(self.right, DiffType::Default, line),
            },
            false,
        );
    }

    fn removed(&mut self, line: &str) {
        self.left += 1;
        self.push(
            LineRow {
                left: SideInfo::new(self.left, DiffType::Removed, removed_text(line)),
                right: SideInfo::default(),
            },
            true,
        );
    }

    fn added(&mut self, line: &str) {
        self.right += 1;
        self.push(
            LineRow {
                left: SideInfo::default(),
                right: SideInfo::new(self.right, DiffType::Added, line),
            },
            true,
        );
    }

    fn modified(&mut self, old: &str, new: &str) {
        self.left += 1;
        self.right += 1;

        // A pair of identical lines is kept as one row but is not a change.
        if old == new {
            self.push(
                LineRow {
                    left: SideInfo::new(self.left, DiffType::Default, removed_text(old)),
                    right: SideInfo::new(self.right, DiffType::Default, new),
                },
                false,
            );
            return;
        }

        let (left_value, right_value) = match self.word_diff {
            Some(mode) => {
                let mut fragments = compute_word_diff(old, new, mode);
                if fragments.left.is_empty() {
                    fragments
                        .left
                        .push(LineFragment::new(DiffType::Default, removed_text(old)));
                }
                (
                    LineValue::Fragments(fragments.left),
                    LineValue::Fragments(fragments.right),
                )
            }
            None => (LineValue::from(removed_text(old)), LineValue::from(new)),
        };
        self.push(
            LineRow {
                left: SideInfo::new(self.left, DiffType::Removed, left_value),
                right: SideInfo::new(self.right, DiffType::Added, right_value),
            },
            true,
        );
    }

    fn push(&mut self, row: LineRow, is_change: bool) {
        let index = self.info.rows.len();
        if is_change || self.is_forced(&row) {
            // Rows are visited in order, so the list stays ascending.
            self.info.diff_lines.push(index);
        }
        self.info.rows.push(row);
    }

    fn is_forced(&self, row: &LineRow) -> bool {
        if self.always_show.is_empty() {
            return false;
        }
        [Side::Left, Side::Right].into_iter().any(|side| {
            row.line_number(side)
                .is_some_and(|line_number| self.always_show.contains(&LineId { side, line_number }))
        })
    }
}
