//! Domain types for side-by-side diffs.
//! Plain data shared by the reconciler, the block computer and callers.

pub mod block;
pub mod error;
pub mod input;
pub mod line;

pub use block::*;
pub use error::*;
pub use input::*;
pub use line::*;
