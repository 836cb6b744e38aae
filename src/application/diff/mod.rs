//! Side-by-side diff use-cases: line reconciliation, block folding, and
//! the combined view.

pub mod hidden_blocks;
pub mod lines;
pub mod view;

pub use hidden_blocks::compute_hidden_blocks;
pub use lines::{LineInformation, compute_line_information, reconcile_chunks};
pub use view::{DiffStats, DiffView, VisibleRow, compute_diff_view};
