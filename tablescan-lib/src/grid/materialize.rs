//! Sheet → display grid projection

use crate::model::Cell;
use crate::model::Sheet;

/// Upper bound on the number of positions a display grid allocates.
///
/// Sheets declaring more are shrunk to the cells they actually carry.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// One addressable grid position covered by a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot<'a> {
    /// The cell covering this position.
    pub cell: &'a Cell,
    /// The coordinate the cell is anchored at.
    pub anchor: (usize, usize),
    /// `true` only at the anchor position. Non-primary slots are covered by
    /// the anchor's span and are never rendered on their own.
    pub primary: bool,
}

/// A cell to emit when rendering a row.
///
/// `rowspan`/`colspan` are the cell's declared spans, not clipped to the
/// grid; the rendering surface handles visual clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedCell<'a> {
    pub row: usize,
    pub col: usize,
    pub cell: &'a Cell,
}

impl<'a> RenderedCell<'a> {
    pub fn text(&self) -> &'a str {
        &self.cell.text
    }

    pub fn rowspan(&self) -> usize {
        self.cell.rowspan
    }

    pub fn colspan(&self) -> usize {
        self.cell.colspan
    }

    pub fn is_header(&self) -> bool {
        self.cell.is_header
    }
}

/// A fully populated `rows × cols` projection of a sheet.
///
/// Positions are `None` only where no cell covers them (malformed or sparse
/// input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGrid<'a> {
    rows: usize,
    cols: usize,
    slots: Vec<Option<GridSlot<'a>>>,
}

impl<'a> DisplayGrid<'a> {
    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `(row, col)` lies within the declared dimensions.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Returns the slot at `(row, col)`, or `None` for holes and out-of-range positions.
    pub fn get(&self, row: usize, col: usize) -> Option<&GridSlot<'a>> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.slots[self.index(row, col)].as_ref()
    }

    /// Returns `true` if `(row, col)` is the anchor of a cell.
    pub fn is_primary(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|slot| slot.primary)
    }

    /// Resolves any covered position to the anchor coordinate of its cell.
    pub fn anchor_of(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        self.get(row, col).map(|slot| slot.anchor)
    }

    /// Returns the slots of one row, left to right.
    pub fn row(&self, row: usize) -> &[Option<GridSlot<'a>>] {
        if row >= self.rows {
            return &[];
        }
        let start = self.index(row, 0);
        &self.slots[start..start + self.cols]
    }

    /// Returns the cells to emit, row by row: one per primary slot.
    pub fn render_rows(&self) -> Vec<Vec<RenderedCell<'a>>> {
        (0..self.rows)
            .map(|row| {
                self.row(row)
                    .iter()
                    .enumerate()
                    .filter_map(|(col, slot)| match slot {
                        Some(slot) if slot.primary => Some(RenderedCell {
                            row,
                            col,
                            cell: slot.cell,
                        }),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn claim(&mut self, row: usize, col: usize, slot: GridSlot<'a>) {
        let index = self.index(row, col);
        self.slots[index] = Some(slot);
    }
}

/// Returns the dimensions to materialize, bounded by [`MAX_GRID_CELLS`].
fn bounded_dimensions(sheet: &Sheet) -> (usize, usize) {
    let (rows, cols) = (sheet.rows, sheet.cols);
    if rows.checked_mul(cols).is_some_and(|n| n <= MAX_GRID_CELLS) {
        return (rows, cols);
    }

    let data_cols = sheet.data.iter().map(Vec::len).max().unwrap_or(0);
    let cols = cols.min(data_cols).min(MAX_GRID_CELLS);
    let rows = rows.min(sheet.data.len()).min(MAX_GRID_CELLS / cols.max(1));
    log::warn!(
        "sheet {} declares {}x{} positions, materializing {rows}x{cols}",
        sheet.sheet_id,
        sheet.rows,
        sheet.cols
    );
    (rows, cols)
}

/// Projects a sheet onto its display grid.
///
/// Cells are visited row-major. A cell claims its anchor position only if that
/// position is still unset; it then marks every other position of its span as
/// covered, silently clipping whatever falls outside the declared dimensions.
/// A cell whose anchor was already claimed by an earlier span contributes
/// nothing (first claim wins).
///
/// Declared dimensions above [`MAX_GRID_CELLS`] positions are shrunk to the
/// extent of `data`, so a bogus size never drives the allocation.
///
/// This is a pure function of the sheet: call it again after every edit
/// rather than keeping the result around.
///
/// # Example
///
/// ```
/// use tablescan_lib::grid::materialize;
/// use tablescan_lib::model::{Cell, Sheet};
///
/// let sheet = Sheet::new(1, "Table_1", 1, 2)
///     .with_data(vec![vec![Cell::new("title").with_span(1, 2), Cell::new("")]]);
/// let grid = materialize(&sheet);
///
/// assert!(grid.is_primary(0, 0));
/// assert_eq!(grid.anchor_of(0, 1), Some((0, 0)));
/// assert_eq!(grid.render_rows()[0].len(), 1);
/// ```
pub fn materialize(sheet: &Sheet) -> DisplayGrid<'_> {
    let (rows, cols) = bounded_dimensions(sheet);
    let mut grid = DisplayGrid::empty(rows, cols);

    for (r, cells) in sheet.data.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            if !grid.in_bounds(r, c) || grid.get(r, c).is_some() {
                continue;
            }

            let anchor = (r, c);
            grid.claim(r, c, GridSlot { cell, anchor, primary: true });

            // Clip the span to the grid before iterating so oversized spans stay cheap.
            let rowspan = cell.rowspan.min(grid.rows - r);
            let colspan = cell.colspan.min(grid.cols - c);
            for dr in 0..rowspan {
                for dc in 0..colspan {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    grid.claim(r + dr, c + dc, GridSlot { cell, anchor, primary: false });
                }
            }
        }
    }

    grid
}
