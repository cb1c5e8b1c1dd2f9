//! Table cell

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// A single OCR-recognized table cell.
///
/// A cell is anchored at its own coordinate in [`Sheet::data`](super::Sheet::data)
/// and visually occupies `rowspan × colspan` grid positions starting there.
/// Only `text` is ever changed after recognition.
///
/// # Example
///
/// ```
/// use tablescan_lib::model::Cell;
///
/// let title = Cell::header("Quarter").with_span(1, 2);
/// assert_eq!(title.colspan, 2);
/// assert!(title.is_header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Text content.
    #[serde(default)]
    pub text: String,
    /// Number of grid rows this cell covers (at least 1).
    #[serde(default = "default_span", deserialize_with = "deserialize_span")]
    pub rowspan: usize,
    /// Number of grid columns this cell covers (at least 1).
    #[serde(default = "default_span", deserialize_with = "deserialize_span")]
    pub colspan: usize,
    /// Whether the OCR service recognized this cell as a header.
    #[serde(default)]
    pub is_header: bool,
}

impl Cell {
    /// Creates a 1×1 body cell.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rowspan: 1,
            colspan: 1,
            is_header: false,
        }
    }

    /// Creates a 1×1 header cell.
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            is_header: true,
            ..Self::new(text)
        }
    }

    /// Sets the row and column span. Zero spans are raised to 1.
    pub fn with_span(mut self, rowspan: usize, colspan: usize) -> Self {
        self.rowspan = rowspan.max(1);
        self.colspan = colspan.max(1);
        self
    }

    /// Returns `true` if this cell covers more than one grid position.
    pub fn is_merged(&self) -> bool {
        self.rowspan > 1 || self.colspan > 1
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new("")
    }
}

fn default_span() -> usize {
    1
}

fn deserialize_span<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let span = usize::deserialize(deserializer)?;
    if span == 0 {
        return Err(serde::de::Error::custom("span must be at least 1"));
    }
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let cell: Cell = serde_json::from_str(r#"{"text": "合计"}"#).unwrap();
        assert_eq!(cell, Cell::new("合计"));
    }

    #[test]
    fn test_deserialize_full() {
        let json = r#"{"text": "标题", "rowspan": 1, "colspan": 2, "is_header": true}"#;
        let cell: Cell = serde_json::from_str(json).unwrap();

        assert_eq!(cell, Cell::header("标题").with_span(1, 2));
        assert!(cell.is_merged());
    }

    #[test]
    fn test_zero_span_rejected() {
        let result = serde_json::from_str::<Cell>(r#"{"text": "x", "colspan": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_span_clamps_zero() {
        let cell = Cell::new("x").with_span(0, 3);
        assert_eq!((cell.rowspan, cell.colspan), (1, 3));
    }
}
