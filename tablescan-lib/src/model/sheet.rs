//! Sheet (a single recognized table)

use serde::Deserialize;
use serde::Serialize;

use super::Cell;

/// A named table recognized from the uploaded image.
///
/// `data` is the canonical, anchor-indexed representation: `data[r][c]` is the
/// cell anchored at row `r`, column `c`. Positions covered by another cell's
/// span are derived when the sheet is materialized, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Identifier assigned by the OCR service, unique within a document.
    pub sheet_id: u32,
    /// Display label (e.g. `Table_1`).
    pub sheet_name: String,
    /// Declared number of grid rows.
    pub rows: usize,
    /// Declared number of grid columns.
    pub cols: usize,
    /// Rows of anchor cells.
    #[serde(default)]
    pub data: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet with the given declared dimensions.
    pub fn new(sheet_id: u32, sheet_name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            sheet_id,
            sheet_name: sheet_name.into(),
            rows,
            cols,
            data: Vec::new(),
        }
    }

    /// Sets the cell rows.
    pub fn with_data(mut self, data: Vec<Vec<Cell>>) -> Self {
        self.data = data;
        self
    }

    /// Returns the cell anchored at `(row, col)`, if present in `data`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data.get(row).and_then(|cells| cells.get(col))
    }

    /// Returns a mutable reference to the cell anchored at `(row, col)`.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.data.get_mut(row).and_then(|cells| cells.get_mut(col))
    }

    /// Returns the `(rows, cols)` extent implied by the cells' anchors and spans.
    pub fn extent(&self) -> (usize, usize) {
        let mut rows = 0;
        let mut cols = 0;
        for (r, cells) in self.data.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                rows = rows.max(r.saturating_add(cell.rowspan));
                cols = cols.max(c.saturating_add(cell.colspan));
            }
        }
        (rows, cols)
    }

    /// Returns `true` if the declared dimensions cover every cell's span.
    pub fn is_consistent(&self) -> bool {
        let (rows, cols) = self.extent();
        rows <= self.rows && cols <= self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        Sheet::new(1, "Table_1", 2, 3).with_data(vec![
            vec![Cell::header("标题").with_span(1, 2), Cell::new(""), Cell::new("备注")],
            vec![Cell::new("a"), Cell::new("b"), Cell::new("c")],
        ])
    }

    #[test]
    fn test_cell_lookup() {
        let sheet = sample();
        assert_eq!(sheet.cell(0, 2).map(|c| c.text.as_str()), Some("备注"));
        assert!(sheet.cell(2, 0).is_none());
        assert!(sheet.cell(0, 3).is_none());
    }

    #[test]
    fn test_extent_and_consistency() {
        let mut sheet = sample();
        assert_eq!(sheet.extent(), (2, 3));
        assert!(sheet.is_consistent());

        sheet.data[1][2].rowspan = 2;
        assert_eq!(sheet.extent(), (3, 3));
        assert!(!sheet.is_consistent());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "sheet_id": 1,
            "sheet_name": "Table_1",
            "rows": 1,
            "cols": 2,
            "data": [[{"text": "a"}, {"text": "b", "is_header": true}]]
        }"#;
        let sheet: Sheet = serde_json::from_str(json).unwrap();

        assert_eq!(sheet.sheet_name, "Table_1");
        assert_eq!(sheet.data[0][1], Cell::header("b"));
    }
}
