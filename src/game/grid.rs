use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A board cell addressed by (column, row).
///
/// Signed so that the neighbour of an edge cell can be represented and then
/// rejected by [`Grid::is_in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn moved_in_direction(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.col + dx, self.row + dy)
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.col - other.col).abs() + (self.row - other.row).abs() == 1
    }
}

/// Top-left corner of something on screen, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Fixed-size board. Immutable once a session has started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl Grid {
    pub fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Board width in pixels
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Board height in pixels
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    pub fn cell_to_pixel(&self, cell: Cell) -> Position {
        Position::new(
            cell.col as f32 * self.cell_size,
            cell.row as f32 * self.cell_size,
        )
    }

    /// Cell containing the given pixel, rounding towards negative infinity.
    ///
    /// Exact inverse of [`Grid::cell_to_pixel`] for any cell size.
    pub fn pixel_to_cell(&self, position: Position) -> Cell {
        Cell::new(self.axis_cell(position.x), self.axis_cell(position.y))
    }

    // Board size clamped into the signed cell range
    fn signed_size(&self) -> (i32, i32) {
        (
            i32::try_from(self.columns).unwrap_or(i32::MAX),
            i32::try_from(self.rows).unwrap_or(i32::MAX),
        )
    }

    // Largest index whose `index * cell_size` does not exceed `v`
    fn axis_cell(&self, v: f32) -> i32 {
        let index = (v / self.cell_size).floor() as i32;
        if index.saturating_add(1) as f32 * self.cell_size <= v {
            index.saturating_add(1)
        } else if index as f32 * self.cell_size > v {
            index.saturating_sub(1)
        } else {
            index
        }
    }

    pub fn is_in_bounds(&self, col: i32, row: i32) -> bool {
        let (columns, rows) = self.signed_size();
        col >= 0 && row >= 0 && col < columns && row < rows
    }

    /// Wall rule for a cell-sized entity whose top-left corner is `position`.
    ///
    /// The far edge is exclusive by one whole cell: `x == width - cell_size`
    /// is already out, so the last column and row are lethal.
    pub fn is_out_of_bounds(&self, position: Position) -> bool {
        // (n - 1) * size is width - size, computed the same way as
        // cell_to_pixel so the last column lands exactly on the limit
        let max_x = (self.columns as f32 - 1.0) * self.cell_size;
        let max_y = (self.rows as f32 - 1.0) * self.cell_size;
        position.x < 0.0 || position.y < 0.0 || position.x >= max_x || position.y >= max_y
    }

    /// Every cell of the board, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (columns, rows) = self.signed_size();
        (0..rows).flat_map(move |row| (0..columns).map(move |col| Cell::new(col, row)))
    }
}
