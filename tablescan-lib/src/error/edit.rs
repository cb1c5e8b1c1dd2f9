//! Table editing error types

/// Errors raised by the cell edit controller and the table session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The position is covered by another cell's span and has no identity of its own.
    #[error("Cell ({row}, {col}) is covered by a merged cell")]
    Suppressed { row: usize, col: usize },

    /// No cell covers the position.
    #[error("Cell ({row}, {col}) is empty")]
    Empty { row: usize, col: usize },

    /// The position lies outside the sheet.
    #[error("Cell ({row}, {col}) is out of range")]
    OutOfRange { row: usize, col: usize },

    /// No task is selected.
    #[error("No task selected")]
    NoTask,

    /// No document is loaded.
    #[error("No table data loaded")]
    NoDocument,

    /// The sheet index does not exist in the loaded document.
    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetOutOfRange { index: usize, count: usize },
}
