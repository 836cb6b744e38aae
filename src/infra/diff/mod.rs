//! The change chunk source and the intra-line differ, both backed by
//! `similar`.

pub mod chunks;
pub mod word;

pub use chunks::{ChangeChunk, chunks_for, diff_json, diff_lines};
pub use word::{CompareMode, CustomDiffFn, DiffMethod, WordDiff, compute_word_diff};
