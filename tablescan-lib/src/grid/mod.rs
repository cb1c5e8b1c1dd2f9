//! Merged-cell display grid and in-place cell editing
//!
//! A [`Sheet`](crate::model::Sheet) stores only anchor cells. [`materialize`]
//! projects it into a fully addressable [`DisplayGrid`] on demand; the grid is
//! never stored, so it cannot drift from the canonical data. Edits go through
//! the [`EditController`] and mutate the sheet by anchor coordinate.

mod edit;
mod materialize;

pub use edit::*;
pub use materialize::*;
