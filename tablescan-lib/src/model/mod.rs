//! Typed models

mod cell;
mod document;
mod sheet;
mod task;

pub use cell::*;
pub use document::*;
pub use sheet::*;
pub use task::*;
