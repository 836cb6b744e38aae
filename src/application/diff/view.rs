//! The full pipeline a renderer consumes: rows, diff lines, foldable
//! blocks and summary counts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::hidden_blocks::compute_hidden_blocks;
use super::lines::compute_line_information;
use crate::domain::{Block, DiffInput, DiffType, HiddenBlocks, LineRow, Result};
use crate::infra::config::DiffOptions;

/// Number of added and removed lines, as shown in a file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiffStats {
    pub additions: usize,
    pub removals: usize,
}

impl DiffStats {
    pub fn from_rows(rows: &[LineRow]) -> Self {
        rows.iter().fold(Self::default(), |mut stats, row| {
            if row.right.kind == DiffType::Added {
                stats.additions += 1;
            }
            if row.left.kind == DiffType::Removed {
                stats.removals += 1;
            }
            stats
        })
    }
}

/// One entry of the rendered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleRow {
    /// Index into `DiffView::rows`
    Line(usize),
    /// A collapsed block, shown as a single expander
    Fold(Block),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffView {
    pub rows: Vec<LineRow>,
    pub diff_lines: Vec<usize>,
    pub hidden: HiddenBlocks,
    pub stats: DiffStats,
}

/// Computes the rows for `old` against `new` and, when folding is enabled,
/// the blocks of unchanged rows that can be collapsed.
pub fn compute_diff_view(
    old: &DiffInput,
    new: &DiffInput,
    options: &DiffOptions,
) -> Result<DiffView> {
    let info = compute_line_information(old, new, options)?;
    let hidden = if options.show_diff_only {
        compute_hidden_blocks(&info.rows, &info.diff_lines, options.extra_lines)
    } else {
        HiddenBlocks::default()
    };
    let stats = DiffStats::from_rows(&info.rows);

    Ok(DiffView {
        rows: info.rows,
        diff_lines: info.diff_lines,
        hidden,
        stats,
    })
}

impl DiffView {
    /// Recomputes the blocks for a new context width without diffing again.
    pub fn recompute_blocks(&mut self, extra_lines: usize) {
        self.hidden = compute_hidden_blocks(&self.rows, &self.diff_lines, extra_lines);
    }

    /// The rows to render, in order. Rows of a collapsed block are replaced
    /// by one `Fold` entry; blocks listed in `expanded` show their rows.
    pub fn visible_rows(&self, expanded: &HashSet<usize>) -> Vec<VisibleRow> {
        let mut out = Vec::with_capacity(self.rows.len());
        for index in 0..self.rows.len() {
            match self.hidden.block_of(index) {
                Some(block) if !expanded.contains(&block.index) => {
                    if block.start_line == index {
                        out.push(VisibleRow::Fold(*block));
                    }
                }
                _ => out.push(VisibleRow::Line(index)),
            }
        }
        out
    }

    pub fn has_changes(&self) -> bool {
        self.stats.additions > 0 || self.stats.removals > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> String {
        (1..=count)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn counts_additions_and_removals() {
        let view = compute_diff_view(
            &DiffInput::from("a\nb\nc"),
            &DiffInput::from("a\nB\nc\nd"),
            &DiffOptions::default(),
        )
        .unwrap();

        assert_eq!(
            view.stats,
            DiffStats {
                additions: 2,
                removals: 1
            }
        );
        assert!(view.has_changes());
    }

    #[test]
    fn folds_and_expands_unchanged_regions() {
        let old = numbered(20);
        let new = old.replace("line 10", "line ten");
        let options = DiffOptions {
            extra_lines: 2,
            ..Default::default()
        };
        let view =
            compute_diff_view(&DiffInput::from(old), &DiffInput::from(new), &options).unwrap();

        assert_eq!(view.diff_lines, vec![9]);
        assert_eq!(view.hidden.blocks.len(), 2);

        let collapsed = view.visible_rows(&HashSet::new());
        assert_eq!(collapsed.len(), 1 + 5 + 1);
        assert!(matches!(
            collapsed[0],
            VisibleRow::Fold(Block {
                start_line: 0,
                end_line: 6,
                ..
            })
        ));
        assert_eq!(collapsed[1], VisibleRow::Line(7));

        let expanded = view.visible_rows(&HashSet::from([0]));
        assert_eq!(expanded.len(), 7 + 5 + 1);
        assert_eq!(expanded[0], VisibleRow::Line(0));
    }

    #[test]
    fn show_all_lines_computes_no_blocks() {
        let options = DiffOptions {
            show_diff_only: false,
            ..Default::default()
        };
        let text = DiffInput::from(numbered(30));
        let view = compute_diff_view(&text, &text, &options).unwrap();

        assert!(view.hidden.blocks.is_empty());
        assert_eq!(view.visible_rows(&HashSet::new()).len(), 30);
        assert!(!view.has_changes());
    }

    #[test]
    fn context_width_change_only_recomputes_blocks() {
        let old = numbered(20);
        let new = old.replace("line 10", "line ten");
        let mut view = compute_diff_view(
            &DiffInput::from(old),
            &DiffInput::from(new),
            &DiffOptions::default(),
        )
        .unwrap();
        let rows = view.rows.clone();

        view.recompute_blocks(0);
        assert_eq!(view.rows, rows);
        assert_eq!(view.hidden.hidden_rows(), 19);
    }
}
