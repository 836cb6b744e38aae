//! Side-by-side diff model.
//!
//! Turns two texts (or two JSON values) into paired left/right rows with
//! per-side line numbers and word level highlights, and groups unchanged
//! rows far from any change into blocks a renderer can fold.
//!
//! ```
//! use sidediff::{DiffInput, DiffOptions, compute_diff_view};
//!
//! let view = compute_diff_view(
//!     &DiffInput::from("fn main() {}\n"),
//!     &DiffInput::from("fn main() { run() }\n"),
//!     &DiffOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(view.diff_lines, vec![0]);
//! ```

pub mod application;
pub mod domain;
pub mod infra;

pub use application::diff::{
    DiffStats, DiffView, LineInformation, VisibleRow, compute_diff_view, compute_hidden_blocks,
    compute_line_information, reconcile_chunks,
};
pub use domain::{
    Block, DiffError, DiffInput, DiffType, HiddenBlocks, LineFragment, LineId, LineRow, LineValue,
    Result, Side, SideInfo,
};
pub use infra::config::{DiffOptions, clamp_extra_lines, load_options};
pub use infra::diff::{ChangeChunk, CompareMode, DiffMethod, compute_word_diff};
