use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A maximal run of rows far enough from every diff line to be folded.
/// `start_line` and `end_line` are inclusive row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub lines: usize,
}

/// Foldable blocks and the owning block of every row inside one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HiddenBlocks {
    pub line_blocks: BTreeMap<usize, usize>,
    pub blocks: Vec<Block>,
}

impl HiddenBlocks {
    pub fn block_of(&self, row: usize) -> Option<&Block> {
        self.line_blocks
            .get(&row)
            .and_then(|index| self.blocks.get(*index))
    }

    pub fn hidden_rows(&self) -> usize {
        self.blocks.iter().map(|b| b.lines).sum()
    }
}
