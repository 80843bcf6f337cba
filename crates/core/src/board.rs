//! Board module - manages the game grid
//!
//! The board is a 10x40 grid of binary cells stored in a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right) and y ranges 0..39
//! (top to bottom). Rows 0..20 are the hidden spawn buffer, rows 20..40 the
//! visible field.
//!
//! All placement helpers take a [`PieceShape`] plus a pivot position and treat
//! a cell outside the grid as blocked.

use arrayvec::ArrayVec;

use crate::pieces::PieceShape;
use crate::types::{BOARD_CELLS, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board - 10 columns x 40 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [bool; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [false; BOARD_CELLS],
        }
    }

    /// Create a board from row-major cells
    pub fn from_cells(cells: [bool; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    /// Build a board whose bottom rows are given as text, top row first.
    ///
    /// `#`, `X` and `x` are filled cells, anything else is empty. The last
    /// string becomes row 39.
    ///
    /// ```
    /// use obseris_core::Board;
    ///
    /// let board = Board::with_bottom_rows(&["#########."]);
    /// assert!(board.is_occupied(0, 39));
    /// assert!(!board.is_occupied(9, 39));
    /// ```
    pub fn with_bottom_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let rows = &rows[rows.len().saturating_sub(BOARD_HEIGHT as usize)..];
        let first = BOARD_HEIGHT as usize - rows.len();
        for (i, row) in rows.iter().enumerate() {
            let y = (first + i) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                if matches!(ch, '#' | 'X' | 'x') {
                    board.set(x as i8, y, true);
                }
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<bool> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, filled: bool) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = filled;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(false))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(true))
    }

    /// Occupied or off the grid; used by the corner rule
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        !self.is_valid(x, y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        self.cells[start..start + BOARD_WIDTH as usize]
            .iter()
            .all(|&c| c)
    }

    /// Every cell of `shape` at pivot (x, y) is on the grid and empty
    pub fn fits(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| self.is_valid(x + dx, y + dy))
    }

    /// Lowest pivot row reachable by straight descent from `y_start`
    pub fn drop_y(&self, shape: &PieceShape, x: i8, y_start: i8) -> i8 {
        let mut y = y_start;
        while self.fits(shape, x, y + 1) {
            y += 1;
        }
        y
    }

    /// Copy of the board with `shape` merged at (x, y); off-grid cells are skipped
    pub fn place(&self, shape: &PieceShape, x: i8, y: i8) -> Board {
        let mut next = self.clone();
        for &(dx, dy) in shape {
            next.set(x + dx, y + dy, true);
        }
        next
    }

    /// Copy of the board with full rows removed, plus the number removed
    pub fn clear_lines(&self) -> (Board, u32) {
        let mut next = self.clone();
        let cleared = next.clear_full_rows().len() as u32;
        (next, cleared)
    }

    /// Clear all full rows in place and return their indices (bottom to top)
    ///
    /// Rows above each removed row move down; empty rows fill the top.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, { BOARD_HEIGHT as usize }> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(false);
        cleared_rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| !c)
    }

    /// Raising `lines` garbage rows would push a filled cell off the top
    pub fn garbage_overflows(&self, lines: usize) -> bool {
        let lines = lines.min(BOARD_HEIGHT as usize);
        self.cells[..lines * BOARD_WIDTH as usize].iter().any(|&c| c)
    }

    /// Shift every row up by `lines` and fill the bottom rows with garbage
    ///
    /// Each garbage row is full except for column `hole`. Rows pushed past the
    /// top are dropped; check [`Board::garbage_overflows`] first.
    pub fn push_garbage(&mut self, lines: usize, hole: u8) {
        let width = BOARD_WIDTH as usize;
        let lines = lines.min(BOARD_HEIGHT as usize);
        if lines == 0 {
            return;
        }
        self.cells.copy_within(lines * width.., 0);
        let first = BOARD_CELLS - lines * width;
        for (i, cell) in self.cells[first..].iter_mut().enumerate() {
            *cell = i % width != hole as usize;
        }
    }

    /// Height of the tallest column measured from the bottom
    pub fn stack_height(&self) -> u8 {
        (0..BOARD_HEIGHT as usize)
            .find(|&y| {
                let start = y * BOARD_WIDTH as usize;
                self.cells[start..start + BOARD_WIDTH as usize]
                    .iter()
                    .any(|&c| c)
            })
            .map(|y| BOARD_HEIGHT - y as u8)
            .unwrap_or(0)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[bool; BOARD_CELLS] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::get_shape;
    use crate::types::{PieceKind, Rotation};

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 39), Some(399));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 40), None);
    }

    #[test]
    fn test_drop_y_on_empty_board() {
        let board = Board::new();
        let shape = get_shape(PieceKind::T, Rotation::North);
        assert_eq!(board.drop_y(&shape, 4, 20), 39);

        let shape = get_shape(PieceKind::O, Rotation::North);
        assert_eq!(board.drop_y(&shape, 4, 20), 38);
    }

    #[test]
    fn test_place_ignores_off_grid_cells() {
        let board = Board::new();
        let shape = get_shape(PieceKind::I, Rotation::North);
        let placed = board.place(&shape, 8, 39);
        assert!(placed.is_occupied(7, 39));
        assert!(placed.is_occupied(9, 39));
        assert_eq!(placed.cells().iter().filter(|&&c| c).count(), 3);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_lines_compacts_rows() {
        let board = Board::with_bottom_rows(&["#.........", "##########", "..#.......", "##########"]);
        let (cleared, count) = board.clear_lines();
        assert_eq!(count, 2);
        assert!(cleared.is_occupied(0, 38));
        assert!(cleared.is_occupied(2, 39));
        assert_eq!(cleared.cells().iter().filter(|&&c| c).count(), 2);
    }

    #[test]
    fn test_clear_many_rows() {
        let full = ["##########"; 6];
        let mut board = Board::with_bottom_rows(&full);
        let rows = board.clear_full_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], 39);
        assert!(board.is_empty());
    }

    #[test]
    fn test_garbage_push_and_overflow() {
        let mut board = Board::with_bottom_rows(&["#........."]);
        assert!(!board.garbage_overflows(3));
        board.push_garbage(3, 4);
        assert!(board.is_occupied(0, 36));
        for y in 37..40 {
            assert!(!board.is_occupied(4, y));
            assert!(board.is_occupied(3, y));
        }

        board.set(2, 1, true);
        assert!(board.garbage_overflows(2));
        assert!(!board.garbage_overflows(1));
    }

    #[test]
    fn test_stack_height() {
        assert_eq!(Board::new().stack_height(), 0);
        assert_eq!(Board::with_bottom_rows(&["#", "."]).stack_height(), 2);
    }
}
