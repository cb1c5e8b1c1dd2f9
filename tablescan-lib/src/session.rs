//! Table editing session
//!
//! A [`TableSession`] owns the canonical [`Document`] for one task, the
//! selected sheet, the cell edit controller and the modified flag. The
//! display grid is never stored; [`TableSession::grid`] materializes it from
//! the canonical sheet on every call.

use crate::api::Spreadsheet;
use crate::api::TableService;
use crate::error::EditError;
use crate::error::Error;
use crate::grid::DisplayGrid;
use crate::grid::EditController;
use crate::grid::EditOutcome;
use crate::grid::materialize;
use crate::model::Document;
use crate::model::Sheet;
use crate::model::TaskId;
use crate::pipeline::RecoveryConfig;
use crate::pipeline::download_with_recovery;

/// In-memory editing state for the tables of one task.
///
/// # Example
///
/// ```ignore
/// let mut session = TableSession::new();
/// session.set_task(task_id);
/// session.fetch(&client).await?;
///
/// session.edit_cell(1, 2, "42")?;
/// assert!(session.is_modified());
///
/// session.save(&client).await?;
/// assert!(!session.is_modified());
/// ```
#[derive(Debug, Default)]
pub struct TableSession {
    task_id: Option<TaskId>,
    document: Option<Document>,
    current_sheet: usize,
    modified: bool,
    editor: EditController,
}

impl TableSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// Switches the session to another task.
    ///
    /// A different task discards the document, any edit in progress and the
    /// modified flag. Returns `false` if the task is already selected.
    pub fn set_task(&mut self, task_id: impl Into<TaskId>) -> bool {
        let task_id = task_id.into();
        if self.task_id.as_ref() == Some(&task_id) {
            return false;
        }
        log::debug!("session switched to task {task_id}");
        self.task_id = Some(task_id);
        self.reset(None);
        true
    }

    /// Clears the task and everything derived from it.
    pub fn clear(&mut self) {
        self.task_id = None;
        self.reset(None);
    }

    /// Replaces the document with one fetched elsewhere.
    pub fn load(&mut self, document: Document) {
        self.task_id = Some(document.task_id.clone());
        self.reset(Some(document));
    }

    fn reset(&mut self, document: Option<Document>) {
        self.document = document;
        self.current_sheet = 0;
        self.modified = false;
        self.editor.cancel();
    }

    /// Fetches the document of the selected task, replacing any loaded one.
    ///
    /// On failure the session keeps its previous state. A document that
    /// belongs to another task is rejected.
    pub async fn fetch<S: TableService + ?Sized>(&mut self, service: &S) -> Result<(), Error> {
        let task_id = self.task_id.clone().ok_or(EditError::NoTask)?;
        let document = service.get_table_data(&task_id).await?;
        if document.task_id != task_id {
            log::warn!(
                "fetched tables for task {} while task {} is selected",
                document.task_id,
                task_id
            );
            return Err(Error::Validation(format!(
                "表格数据属于任务 {}，与当前任务 {task_id} 不符",
                document.task_id
            )));
        }
        log::debug!(
            "fetched {} sheets for task {}",
            document.total_sheets(),
            task_id
        );
        self.reset(Some(document));
        Ok(())
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Returns `true` if the document has unsaved edits.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    /// Index of the selected sheet.
    pub fn current_sheet(&self) -> usize {
        self.current_sheet
    }

    /// Selects another sheet, committing any edit in progress first.
    pub fn select_sheet(&mut self, index: usize) -> Result<EditOutcome, EditError> {
        let count = self
            .document
            .as_ref()
            .ok_or(EditError::NoDocument)?
            .total_sheets();
        if index >= count {
            return Err(EditError::SheetOutOfRange { index, count });
        }
        let outcome = self.commit_edit()?;
        self.current_sheet = index;
        Ok(outcome)
    }

    /// Returns the selected sheet.
    pub fn sheet(&self) -> Option<&Sheet> {
        self.document.as_ref()?.sheet(self.current_sheet)
    }

    /// Materializes the display grid of the selected sheet.
    pub fn grid(&self) -> Option<DisplayGrid<'_>> {
        self.sheet().map(materialize)
    }

    /// Starts editing the cell shown at `(row, col)` of the selected sheet.
    pub fn begin_edit(&mut self, row: usize, col: usize) -> Result<EditOutcome, EditError> {
        let (editor, sheet) = self.editing_parts()?;
        let outcome = editor.begin(sheet, row, col)?;
        self.note(&outcome);
        Ok(outcome)
    }

    /// Replaces the draft of the edit in progress.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        self.editor.set_draft(text)
    }

    /// Commits the edit in progress, if any.
    pub fn commit_edit(&mut self) -> Result<EditOutcome, EditError> {
        if !self.editor.is_editing() {
            return Ok(EditOutcome::NotEditing);
        }
        let (editor, sheet) = self.editing_parts()?;
        let outcome = editor.commit(sheet)?;
        self.note(&outcome);
        Ok(outcome)
    }

    /// Discards the edit in progress.
    pub fn cancel_edit(&mut self) -> EditOutcome {
        self.editor.cancel()
    }

    /// Sets the text of the cell shown at `(row, col)` in one step.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        text: impl Into<String>,
    ) -> Result<EditOutcome, EditError> {
        self.begin_edit(row, col)?;
        self.set_draft(text);
        self.commit_edit()
    }

    /// Saves the document if it has unsaved edits.
    ///
    /// A pending edit is committed first. Returns `false` without calling the
    /// service when there is nothing to save. The modified flag is cleared
    /// only after the service accepts the document.
    pub async fn save<S: TableService + ?Sized>(&mut self, service: &S) -> Result<bool, Error> {
        self.commit_edit()?;
        if !self.modified {
            return Ok(false);
        }

        let task_id = self.task_id.clone().ok_or(EditError::NoTask)?;
        let document = self.document.as_ref().ok_or(EditError::NoDocument)?;
        if !document.has_data() {
            return Err(Error::Validation("表格数据为空".to_string()));
        }

        service.save_table_data(&task_id, document).await?;
        self.modified = false;
        log::info!("saved tables for task {task_id}");
        Ok(true)
    }

    /// Downloads the spreadsheet of the selected task.
    ///
    /// With `save_first`, unsaved edits are saved before downloading;
    /// otherwise the last saved version is downloaded.
    pub async fn download<S: TableService + ?Sized>(
        &mut self,
        service: &S,
        save_first: bool,
        recovery: &RecoveryConfig,
    ) -> Result<Spreadsheet, Error> {
        if save_first {
            self.save(service).await?;
        }
        let task_id = self.task_id.clone().ok_or(EditError::NoTask)?;
        download_with_recovery(service, &task_id, recovery).await
    }

    fn editing_parts(&mut self) -> Result<(&mut EditController, &mut Sheet), EditError> {
        let document = self.document.as_mut().ok_or(EditError::NoDocument)?;
        let count = document.total_sheets();
        let sheet = document
            .sheet_mut(self.current_sheet)
            .ok_or(EditError::SheetOutOfRange {
                index: self.current_sheet,
                count,
            })?;
        Ok((&mut self.editor, sheet))
    }

    fn note(&mut self, outcome: &EditOutcome) {
        if outcome.is_committed() {
            self.modified = true;
        }
    }
}
