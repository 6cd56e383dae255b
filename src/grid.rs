//! Playfield grid: fixed cell matrix, full-row detection and row compaction.

use crate::catalog::KIND_COUNT;

/// Columns in the playfield.
pub const WIDTH: usize = 10;
/// Rows in the playfield, including the overflow buffer.
pub const HEIGHT: usize = 24;
/// Rows shown as the normal playfield; the rest sit above it.
pub const VISIBLE_HEIGHT: usize = 20;
/// Overflow rows above the visible area (rows `0..BUFFER_HEIGHT`).
pub const BUFFER_HEIGHT: usize = HEIGHT - VISIBLE_HEIGHT;

/// One flag per grid row, true where the row is full.
pub type RowFlags = [bool; HEIGHT];

/// Playfield: `WIDTH x HEIGHT` cell values. Row 0 is the top of the overflow buffer.
///
/// Cells hold 0 (empty) or the cell value of the piece kind that filled them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [u8; WIDTH * HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [0; WIDTH * HEIGHT],
        }
    }

    #[inline]
    fn index(row: usize, col: usize) -> usize {
        debug_assert!(row < HEIGHT && col < WIDTH, "cell ({row}, {col}) outside grid");
        row * WIDTH + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[Self::index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(usize::from(value) <= KIND_COUNT, "cell value {value} out of range");
        self.cells[Self::index(row, col)] = value;
    }

    /// Cells of one row, left to right.
    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = Self::index(row, 0);
        &self.cells[start..start + WIDTH]
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(WIDTH)
    }

    pub fn row_is_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|&c| c != 0)
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.row(row).iter().all(|&c| c == 0)
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Scans every row once. Returns the count of full rows and their flags.
    pub fn find_full_rows(&self) -> (usize, RowFlags) {
        let mut flags = [false; HEIGHT];
        let mut count = 0;
        for (row, flag) in flags.iter_mut().enumerate() {
            *flag = self.row_is_full(row);
            count += usize::from(*flag);
        }
        (count, flags)
    }

    /// Removes the flagged rows and drops everything above them into the gap.
    ///
    /// Single bottom-up pass: `src` walks upward skipping flagged rows and each
    /// destination row takes the next surviving source row. Once `src` runs past
    /// row 0 the remaining destination rows are zero-filled. Since `src >= dst`
    /// throughout, copies never read a row that was already overwritten.
    pub fn clear_rows(&mut self, flags: &RowFlags) {
        let mut src = HEIGHT as isize - 1;
        for dst in (0..HEIGHT).rev() {
            while src >= 0 && flags[src as usize] {
                src -= 1;
            }
            let dst_start = dst * WIDTH;
            if src < 0 {
                self.cells[dst_start..dst_start + WIDTH].fill(0);
            } else {
                let src_start = src as usize * WIDTH;
                if src_start != dst_start {
                    self.cells.copy_within(src_start..src_start + WIDTH, dst_start);
                }
                src -= 1;
            }
        }
    }
}
