//! Plain-text rendering of display grids.

use tablescan_lib::grid::DisplayGrid;
use tablescan_lib::model::Sheet;

/// Marker for a position covered by a cell to its left.
const COVERED_LEFT: &str = "<";
/// Marker for a position covered by a cell above.
const COVERED_ABOVE: &str = "^";

/// Renders a grid as aligned columns.
///
/// Anchor positions show their text, header cells wrapped in `*`. Covered
/// positions point at their anchor; holes stay blank.
pub fn render_grid(grid: &DisplayGrid<'_>) -> String {
    let labels: Vec<Vec<String>> = (0..grid.rows())
        .map(|row| {
            (0..grid.cols())
                .map(|col| label(grid, row, col))
                .collect()
        })
        .collect();

    let mut widths = vec![0; grid.cols()];
    for row in &labels {
        for (col, text) in row.iter().enumerate() {
            widths[col] = widths[col].max(text.chars().count());
        }
    }

    let mut out = String::new();
    for row in &labels {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, width)| {
                let pad = width - text.chars().count();
                format!("{text}{}", " ".repeat(pad))
            })
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

fn label(grid: &DisplayGrid<'_>, row: usize, col: usize) -> String {
    let Some(slot) = grid.get(row, col) else {
        return String::new();
    };
    if !slot.primary {
        let marker = if slot.anchor.0 == row {
            COVERED_LEFT
        } else {
            COVERED_ABOVE
        };
        return marker.to_string();
    }

    let text = slot.cell.text.replace('\n', " ");
    if slot.cell.is_header {
        format!("*{text}*")
    } else {
        text
    }
}

/// Lists the merged cells of a grid with their declared spans.
pub fn render_merges(grid: &DisplayGrid<'_>) -> Vec<String> {
    grid.render_rows()
        .into_iter()
        .flatten()
        .filter(|cell| cell.rowspan() > 1 || cell.colspan() > 1)
        .map(|cell| {
            format!(
                "({}, {}) spans {}x{}: {}",
                cell.row,
                cell.col,
                cell.rowspan(),
                cell.colspan(),
                cell.text()
            )
        })
        .collect()
}

/// One-line sheet summary, e.g. `[0] Table_1 (3x4)`.
pub fn sheet_title(index: usize, sheet: &Sheet) -> String {
    format!("[{index}] {} ({}x{})", sheet.sheet_name, sheet.rows, sheet.cols)
}
