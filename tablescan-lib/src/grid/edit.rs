//! Cell edit state machine

use super::materialize;
use crate::error::EditError;
use crate::model::Sheet;

/// Editing state of one table view. At most one cell is under edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// No cell is under edit.
    #[default]
    Idle,
    /// The anchor cell at `(row, col)` is under edit with an uncommitted draft.
    Editing { row: usize, col: usize, draft: String },
}

/// What a transition did to the canonical sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// There was no edit in progress.
    NotEditing,
    /// The draft matched the current text; nothing was written.
    Unchanged,
    /// The draft replaced the cell text.
    Committed {
        row: usize,
        col: usize,
        /// The text before the commit.
        previous: String,
    },
    /// The draft was discarded.
    Cancelled,
}

impl EditOutcome {
    /// Returns `true` if the canonical sheet was changed.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Drives `idle → editing → (commit | cancel) → idle` for one sheet.
///
/// The controller never holds on to the sheet or to a display grid; every
/// transition that needs them takes the canonical sheet as an argument.
/// Only `text` is ever written, spans and header flags are left untouched.
///
/// Callers are responsible for flagging the document as modified whenever a
/// transition reports [`EditOutcome::Committed`].
///
/// # Example
///
/// ```
/// use tablescan_lib::grid::{EditController, EditOutcome};
/// use tablescan_lib::model::{Cell, Sheet};
///
/// let mut sheet = Sheet::new(1, "Table_1", 1, 1).with_data(vec![vec![Cell::new("old")]]);
/// let mut editor = EditController::new();
///
/// editor.begin(&mut sheet, 0, 0).unwrap();
/// editor.set_draft("new");
/// let outcome = editor.commit(&mut sheet).unwrap();
///
/// assert!(outcome.is_committed());
/// assert_eq!(sheet.data[0][0].text, "new");
/// ```
#[derive(Debug, Default)]
pub struct EditController {
    state: EditState,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Returns the coordinate under edit.
    pub fn editing_at(&self) -> Option<(usize, usize)> {
        match self.state {
            EditState::Editing { row, col, .. } => Some((row, col)),
            EditState::Idle => None,
        }
    }

    /// Returns the current draft text.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Starts editing the anchor cell shown at display position `(row, col)`.
    ///
    /// The draft starts as the cell's current text. Only primary positions are
    /// editable. If a different cell is already under edit, its draft is
    /// committed first and that commit's outcome is returned; otherwise the
    /// result is [`EditOutcome::NotEditing`]. Beginning on the cell already
    /// under edit keeps its draft and reports [`EditOutcome::Unchanged`].
    pub fn begin(
        &mut self,
        sheet: &mut Sheet,
        row: usize,
        col: usize,
    ) -> Result<EditOutcome, EditError> {
        if self.editing_at() == Some((row, col)) {
            return Ok(EditOutcome::Unchanged);
        }

        let text = {
            let grid = materialize(sheet);
            match grid.get(row, col) {
                Some(slot) if slot.primary => slot.cell.text.clone(),
                Some(_) => return Err(EditError::Suppressed { row, col }),
                None if grid.in_bounds(row, col) => return Err(EditError::Empty { row, col }),
                None => return Err(EditError::OutOfRange { row, col }),
            }
        };

        let previous = self.commit(sheet)?;
        log::debug!("begin edit at ({row}, {col})");
        self.state = EditState::Editing {
            row,
            col,
            draft: text,
        };
        Ok(previous)
    }

    /// Replaces the draft. Returns `false` if no cell is under edit.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            EditState::Idle => false,
        }
    }

    /// Commits the draft and returns to idle.
    ///
    /// Triggered by confirmation or by focus leaving the cell. A draft equal to
    /// the current text writes nothing.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] if the edited coordinate no longer exists in
    /// `sheet`, which means the sheet was swapped under an active edit.
    pub fn commit(&mut self, sheet: &mut Sheet) -> Result<EditOutcome, EditError> {
        let EditState::Editing { row, col, draft } = std::mem::take(&mut self.state) else {
            return Ok(EditOutcome::NotEditing);
        };

        let cell = sheet
            .cell_mut(row, col)
            .ok_or(EditError::OutOfRange { row, col })?;

        if cell.text == draft {
            return Ok(EditOutcome::Unchanged);
        }

        let previous = std::mem::replace(&mut cell.text, draft);
        log::debug!("committed edit at ({row}, {col})");
        Ok(EditOutcome::Committed { row, col, previous })
    }

    /// Discards the draft and returns to idle. The sheet is never touched.
    pub fn cancel(&mut self) -> EditOutcome {
        match std::mem::take(&mut self.state) {
            EditState::Editing { .. } => EditOutcome::Cancelled,
            EditState::Idle => EditOutcome::NotEditing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn sheet() -> Sheet {
        Sheet::new(1, "Table_1", 2, 3).with_data(vec![
            vec![Cell::header("标题").with_span(1, 2), Cell::new(""), Cell::new("备注")],
            vec![Cell::new("a"), Cell::new("b"), Cell::new("c")],
        ])
    }

    #[test]
    fn test_begin_sets_draft_from_canonical_text() {
        let mut sheet = sheet();
        let mut editor = EditController::new();

        assert_eq!(editor.begin(&mut sheet, 0, 2).unwrap(), EditOutcome::NotEditing);
        assert_eq!(editor.editing_at(), Some((0, 2)));
        assert_eq!(editor.draft(), Some("备注"));
    }

    #[test]
    fn test_begin_rejects_suppressed_and_missing_positions() {
        let mut sheet = sheet();
        sheet.data[1].pop();
        let mut editor = EditController::new();

        assert_eq!(
            editor.begin(&mut sheet, 0, 1),
            Err(EditError::Suppressed { row: 0, col: 1 })
        );
        assert_eq!(editor.begin(&mut sheet, 1, 2), Err(EditError::Empty { row: 1, col: 2 }));
        assert_eq!(
            editor.begin(&mut sheet, 5, 0),
            Err(EditError::OutOfRange { row: 5, col: 0 })
        );
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_commit_changed_text() {
        let mut sheet = sheet();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 1, 1).unwrap();
        assert!(editor.set_draft("B"));
        let outcome = editor.commit(&mut sheet).unwrap();

        assert_eq!(
            outcome,
            EditOutcome::Committed {
                row: 1,
                col: 1,
                previous: "b".to_string()
            }
        );
        assert_eq!(sheet.data[1][1].text, "B");
        assert_eq!(editor.state(), &EditState::Idle);
    }

    #[test]
    fn test_commit_unchanged_text_writes_nothing() {
        let mut sheet = sheet();
        let before = sheet.clone();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 0, 0).unwrap();
        editor.set_draft("标题");

        assert_eq!(editor.commit(&mut sheet).unwrap(), EditOutcome::Unchanged);
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_commit_only_touches_text() {
        let mut sheet = sheet();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 0, 0).unwrap();
        editor.set_draft("新标题");
        editor.commit(&mut sheet).unwrap();

        let cell = &sheet.data[0][0];
        assert_eq!(cell.text, "新标题");
        assert_eq!((cell.rowspan, cell.colspan, cell.is_header), (1, 2, true));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut sheet = sheet();
        let before = sheet.clone();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 1, 0).unwrap();
        editor.set_draft("something else");

        assert_eq!(editor.cancel(), EditOutcome::Cancelled);
        assert_eq!(sheet, before);
        assert_eq!(editor.commit(&mut sheet).unwrap(), EditOutcome::NotEditing);
    }

    #[test]
    fn test_begin_elsewhere_commits_prior_draft() {
        let mut sheet = sheet();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 1, 0).unwrap();
        editor.set_draft("A");
        let outcome = editor.begin(&mut sheet, 1, 2).unwrap();

        assert!(outcome.is_committed());
        assert_eq!(sheet.data[1][0].text, "A");
        assert_eq!(editor.editing_at(), Some((1, 2)));
        assert_eq!(editor.draft(), Some("c"));
    }

    #[test]
    fn test_begin_same_cell_keeps_draft() {
        let mut sheet = sheet();
        let mut editor = EditController::new();

        editor.begin(&mut sheet, 1, 0).unwrap();
        editor.set_draft("draft");

        assert_eq!(editor.begin(&mut sheet, 1, 0).unwrap(), EditOutcome::Unchanged);
        assert_eq!(editor.draft(), Some("draft"));
        assert_eq!(sheet.data[1][0].text, "a");
    }

    #[test]
    fn test_commit_on_replaced_sheet_fails() {
        let mut sheet = sheet();
        let mut editor = EditController::new();
        editor.begin(&mut sheet, 1, 2).unwrap();

        let mut smaller = Sheet::new(2, "Table_2", 1, 1).with_data(vec![vec![Cell::new("x")]]);
        assert_eq!(
            editor.commit(&mut smaller),
            Err(EditError::OutOfRange { row: 1, col: 2 })
        );
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_set_draft_when_idle() {
        let mut editor = EditController::new();
        assert!(!editor.set_draft("x"));
        assert_eq!(editor.cancel(), EditOutcome::NotEditing);
    }
}
