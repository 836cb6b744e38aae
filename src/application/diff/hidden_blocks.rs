//! Groups rows that are far from every diff line into foldable blocks.

use log::debug;
use std::collections::BTreeMap;

use crate::domain::{Block, HiddenBlocks, LineRow};

/// Computes the foldable blocks of `rows`.
///
/// A row is protected when it lies within `extra_lines` of some entry of
/// `diff_lines`. Every maximal run of unprotected rows becomes one block,
/// numbered in order of appearance.
pub fn compute_hidden_blocks(
    rows: &[LineRow],
    diff_lines: &[usize],
    extra_lines: usize,
) -> HiddenBlocks {
    let protected = protected_rows(rows.len(), diff_lines, extra_lines);

    let mut blocks: Vec<Block> = Vec::new();
    let mut line_blocks = BTreeMap::new();
    let mut current: Option<usize> = None;

    for (row, is_protected) in protected.into_iter().enumerate() {
        if is_protected {
            current = None;
            continue;
        }

        let index = match current {
            Some(index) => {
                let block = &mut blocks[index];
                block.end_line = row;
                block.lines += 1;
                index
            }
            None => {
                let index = blocks.len();
                blocks.push(Block {
                    index,
                    start_line: row,
                    end_line: row,
                    lines: 1,
                });
                current = Some(index);
                index
            }
        };
        line_blocks.insert(row, index);
    }

    debug!(
        "computed {} hidden blocks over {} rows (extra lines: {})",
        blocks.len(),
        rows.len(),
        extra_lines
    );
    HiddenBlocks {
        line_blocks,
        blocks,
    }
}

/// Marks the rows within `extra_lines` of a diff line. Linear in the number
/// of rows plus the covered ranges.
fn protected_rows(row_count: usize, diff_lines: &[usize], extra_lines: usize) -> Vec<bool> {
    let mut protected = vec![false; row_count];
    if row_count == 0 {
        return protected;
    }

    for &line in diff_lines {
        let start = line.saturating_sub(extra_lines);
        if start >= row_count {
            continue;
        }
        let end = line.saturating_add(extra_lines).min(row_count - 1);
        protected[start..=end].fill(true);
    }
    protected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<LineRow> {
        vec![LineRow::default(); count]
    }

    fn block(index: usize, start_line: usize, end_line: usize) -> Block {
        Block {
            index,
            start_line,
            end_line,
            lines: end_line - start_line + 1,
        }
    }

    #[test]
    fn folds_rows_outside_context_window() {
        let hidden = compute_hidden_blocks(&rows(20), &[10], 2);

        assert_eq!(hidden.blocks, vec![block(0, 0, 7), block(1, 13, 19)]);
        assert_eq!(hidden.line_blocks.get(&0), Some(&0));
        assert_eq!(hidden.line_blocks.get(&7), Some(&0));
        assert_eq!(hidden.line_blocks.get(&8), None);
        assert_eq!(hidden.line_blocks.get(&13), Some(&1));
        assert_eq!(hidden.line_blocks.len(), 15);
    }

    #[test]
    fn overlapping_windows_leave_no_gap() {
        let hidden = compute_hidden_blocks(&rows(12), &[3, 7], 2);

        assert_eq!(hidden.blocks, vec![block(0, 0, 0), block(1, 10, 11)]);
    }

    #[test]
    fn no_diff_lines_folds_everything() {
        let hidden = compute_hidden_blocks(&rows(4), &[], 3);

        assert_eq!(hidden.blocks, vec![block(0, 0, 3)]);
        assert_eq!(hidden.hidden_rows(), 4);
    }

    #[test]
    fn zero_context_protects_only_diff_lines() {
        let hidden = compute_hidden_blocks(&rows(5), &[0, 2, 4], 0);

        assert_eq!(hidden.blocks, vec![block(0, 1, 1), block(1, 3, 3)]);
    }

    #[test]
    fn diff_line_past_the_end_still_protects_its_window() {
        let hidden = compute_hidden_blocks(&rows(5), &[6], 2);

        assert_eq!(hidden.blocks, vec![block(0, 0, 3)]);
    }

    #[test]
    fn empty_rows_give_no_blocks() {
        let hidden = compute_hidden_blocks(&[], &[0], 3);

        assert!(hidden.blocks.is_empty());
        assert!(hidden.line_blocks.is_empty());
    }

    #[test]
    fn blocks_are_ordered_and_disjoint() {
        let diff_lines = [5, 6, 20, 41, 60];
        let hidden = compute_hidden_blocks(&rows(70), &diff_lines, 3);

        for pair in hidden.blocks.windows(2) {
            assert!(pair[0].end_line + 1 < pair[1].start_line);
        }
        for (i, b) in hidden.blocks.iter().enumerate() {
            assert_eq!(b.index, i);
            assert!(b.start_line <= b.end_line);
            for row in b.start_line..=b.end_line {
                assert!(diff_lines.iter().all(|&d| row + 3 < d || row > d + 3));
                assert_eq!(hidden.line_blocks.get(&row), Some(&i));
            }
        }
    }
}
