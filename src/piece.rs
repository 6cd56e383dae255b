//! Active piece: position and rotation on the grid, collision checks and locking.

use crate::catalog::{PieceKind, filled_cells};
use crate::grid::{Grid, HEIGHT, WIDTH};

/// The falling piece. `row`/`col` locate the top-left corner of the kind's
/// bounding square on the grid; `rotation` is 0..4 clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub row: i32,
    pub col: i32,
    pub rotation: u8,
}

impl ActivePiece {
    /// Spawn placement: top row of the full grid, centre column, unrotated.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            row: 0,
            col: (WIDTH / 2) as i32,
            rotation: 0,
        }
    }

    /// Grid coordinates (row, col) and value of each filled cell. May lie off the grid.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> {
        let (row, col) = (self.row, self.col);
        filled_cells(self.kind, self.rotation).map(move |(r, c, v)| (row + r as i32, col + c as i32, v))
    }

    /// True iff every filled cell is inside the grid and on an empty cell.
    pub fn is_valid(&self, grid: &Grid) -> bool {
        self.cells().all(|(row, col, _)| {
            (0..HEIGHT as i32).contains(&row)
                && (0..WIDTH as i32).contains(&col)
                && grid.get(row as usize, col as usize) == 0
        })
    }

    /// Writes the piece's cells into the grid without checking for overlap.
    ///
    /// Callers validate first; cells outside the grid are dropped.
    pub fn commit(&self, grid: &mut Grid) {
        for (row, col, value) in self.cells() {
            if (0..HEIGHT as i32).contains(&row) && (0..WIDTH as i32).contains(&col) {
                grid.set(row as usize, col as usize, value);
            }
        }
    }

    /// Where the piece would lock if dropped now. Pure query.
    pub fn ghost(&self, grid: &Grid) -> Self {
        let mut ghost = *self;
        if !ghost.is_valid(grid) {
            return ghost;
        }
        while ghost.lowered().is_valid(grid) {
            ghost.row += 1;
        }
        ghost
    }

    pub fn shifted(&self, dcol: i32) -> Self {
        Self {
            col: self.col + dcol,
            ..*self
        }
    }

    pub fn lowered(&self) -> Self {
        Self {
            row: self.row + 1,
            ..*self
        }
    }

    pub fn rotated_cw(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(row: i32, col: i32) -> ActivePiece {
        ActivePiece {
            kind: PieceKind::O,
            row,
            col,
            rotation: 0,
        }
    }

    #[test]
    fn test_spawn_position() {
        let piece = ActivePiece::spawn(PieceKind::T);
        assert_eq!((piece.row, piece.col, piece.rotation), (0, 5, 0));
    }

    #[test]
    fn test_is_valid_on_empty_grid() {
        let grid = Grid::new();
        assert!(square_at(0, 0).is_valid(&grid));
        assert!(square_at(HEIGHT as i32 - 2, WIDTH as i32 - 2).is_valid(&grid));
    }

    #[test]
    fn test_is_valid_rejects_out_of_bounds() {
        let grid = Grid::new();
        assert!(!square_at(-1, 0).is_valid(&grid));
        assert!(!square_at(HEIGHT as i32 - 1, 0).is_valid(&grid));
        assert!(!square_at(0, -1).is_valid(&grid));
        assert!(!square_at(0, WIDTH as i32 - 1).is_valid(&grid));
    }

    #[test]
    fn test_is_valid_rejects_occupied_cell() {
        let mut grid = Grid::new();
        grid.set(11, 4, 3);
        assert!(!square_at(10, 3).is_valid(&grid));
        assert!(!square_at(11, 4).is_valid(&grid));
        assert!(square_at(10, 5).is_valid(&grid));
        assert!(square_at(12, 4).is_valid(&grid));
    }

    #[test]
    fn test_empty_bitmap_cells_may_hang_outside() {
        // I at rotation 0 only fills the second row of its 4x4 square.
        let grid = Grid::new();
        let piece = ActivePiece {
            kind: PieceKind::I,
            row: -1,
            col: 0,
            rotation: 0,
        };
        assert!(piece.is_valid(&grid));
        let low = ActivePiece {
            row: HEIGHT as i32 - 2,
            ..piece
        };
        assert!(low.is_valid(&grid));
        // Rotated to vertical it fills column 2 of its square.
        let vertical = ActivePiece {
            row: 0,
            col: -2,
            rotation: 1,
            ..piece
        };
        assert!(vertical.is_valid(&grid));
        assert!(!vertical.shifted(-1).is_valid(&grid));
    }

    #[test]
    fn test_commit_writes_cells() {
        let mut grid = Grid::new();
        square_at(22, 5).commit(&mut grid);
        assert_eq!(grid.occupied_count(), 4);
        for (row, col) in [(22, 5), (22, 6), (23, 5), (23, 6)] {
            assert_eq!(grid.get(row, col), PieceKind::O.cell_value());
        }
    }

    #[test]
    fn test_commit_completes_row() {
        let mut grid = Grid::new();
        for col in 0..WIDTH - 1 {
            grid.set(HEIGHT - 1, col, 1);
        }
        assert_eq!(grid.find_full_rows().0, 0);
        // Vertical I in column 9 reaching the bottom row.
        let piece = ActivePiece {
            kind: PieceKind::I,
            row: HEIGHT as i32 - 4,
            col: WIDTH as i32 - 3,
            rotation: 1,
        };
        assert!(piece.is_valid(&grid));
        piece.commit(&mut grid);
        let (count, flags) = grid.find_full_rows();
        assert_eq!(count, 1);
        assert!(flags[HEIGHT - 1]);
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let mut grid = Grid::new();
        grid.set(15, 5, 1);
        let ghost = square_at(0, 5).ghost(&grid);
        assert_eq!(ghost.row, 13);
        assert!(ghost.is_valid(&grid));
        assert!(!ghost.lowered().is_valid(&grid));

        let floor = square_at(0, 0).ghost(&grid);
        assert_eq!(floor.row, HEIGHT as i32 - 2);
    }
}
