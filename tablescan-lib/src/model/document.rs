//! Editable table document

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeStruct;

use super::Sheet;
use super::TaskId;

/// All tables recognized for one task.
///
/// This is both the payload returned by the table-data endpoint and the body
/// sent back when saving edits. Sheet order is tab order.
///
/// `total_sheets` is part of the wire format but is always derived from
/// `sheets` when serializing, so it can never disagree with the content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// The task this document belongs to.
    pub task_id: TaskId,
    /// Task status as reported by the service when the document was fetched.
    #[serde(default)]
    pub status: String,
    /// Recognized sheets in display order.
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Document {
    /// Creates a document with no sheets.
    pub fn new(task_id: impl Into<TaskId>, status: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: status.into(),
            sheets: Vec::new(),
        }
    }

    /// Adds a sheet at the end of the tab order.
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Returns the number of sheets.
    pub fn total_sheets(&self) -> usize {
        self.sheets.len()
    }

    /// Returns `true` if there is at least one sheet to show.
    pub fn has_data(&self) -> bool {
        !self.sheets.is_empty()
    }

    /// Returns the sheet at the given tab index.
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Returns the sheet at the given tab index, mutably.
    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Document", 4)?;
        state.serialize_field("task_id", &self.task_id)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("total_sheets", &self.sheets.len())?;
        state.serialize_field("sheets", &self.sheets)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    #[test]
    fn test_deserialize_response() {
        let json = r#"{
            "task_id": "550e8400-e29b-41d4-a716-446655440000",
            "status": "editable",
            "total_sheets": 1,
            "sheets": [
                {"sheet_id": 1, "sheet_name": "Table_1", "rows": 1, "cols": 1, "data": [[{"text": "x"}]]}
            ]
        }"#;
        let document: Document = serde_json::from_str(json).unwrap();

        assert_eq!(document.task_id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(document.total_sheets(), 1);
        assert_eq!(document.sheet(0).unwrap().data[0][0], Cell::new("x"));
    }

    #[test]
    fn test_serialize_derives_total_sheets() {
        let document = Document::new("t1", "editable")
            .with_sheet(Sheet::new(1, "Table_1", 0, 0))
            .with_sheet(Sheet::new(2, "Table_2", 0, 0));

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["total_sheets"], 2);
        assert_eq!(value["task_id"], "t1");
        assert_eq!(value["sheets"][1]["sheet_name"], "Table_2");
    }
}
