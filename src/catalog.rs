//! Piece catalog: the seven kinds, their square bitmaps and computed rotations.

/// Number of piece kinds; also the largest cell value a grid may hold.
pub const KIND_COUNT: usize = 7;

/// Piece kinds (I, O, T, S, Z, J, L), in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Square bitmap of one kind, row-major, `side * side` entries.
struct Shape {
    side: usize,
    cells: &'static [u8],
}

#[rustfmt::skip]
static CATALOG: [Shape; KIND_COUNT] = [
    Shape { side: 4, cells: &[
        0, 0, 0, 0,
        1, 1, 1, 1,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ] },
    Shape { side: 2, cells: &[
        2, 2,
        2, 2,
    ] },
    Shape { side: 3, cells: &[
        0, 0, 0,
        3, 3, 3,
        0, 3, 0,
    ] },
    Shape { side: 3, cells: &[
        0, 0, 0,
        0, 4, 4,
        4, 4, 0,
    ] },
    Shape { side: 3, cells: &[
        0, 0, 0,
        5, 5, 0,
        0, 5, 5,
    ] },
    Shape { side: 3, cells: &[
        0, 0, 0,
        6, 0, 0,
        6, 6, 6,
    ] },
    Shape { side: 3, cells: &[
        0, 0, 0,
        0, 0, 7,
        7, 7, 7,
    ] },
];

impl PieceKind {
    pub const ALL: [Self; KIND_COUNT] = [Self::I, Self::O, Self::T, Self::S, Self::Z, Self::J, Self::L];

    /// Position in the catalog (0..7).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Value written into grid cells occupied by this kind (1..=7).
    #[inline]
    pub fn cell_value(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Self::cell_value`]; `None` for 0 or anything out of range.
    pub fn from_cell_value(value: u8) -> Option<Self> {
        match value {
            1..=7 => Some(Self::ALL[usize::from(value - 1)]),
            _ => None,
        }
    }

    /// Side length of the bounding square.
    #[inline]
    pub fn side(self) -> usize {
        CATALOG[self.index()].side
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::O => "O",
            Self::T => "T",
            Self::S => "S",
            Self::Z => "Z",
            Self::J => "J",
            Self::L => "L",
        }
    }
}

/// Cell value at (`row`, `col`) of `kind`'s bounding square under `rotation`.
///
/// Rotations 1..=3 are the 90°, 180° and 270° clockwise remaps of the square;
/// nothing but the unrotated bitmap is stored. Coordinates outside the square
/// or rotations above 3 read as empty.
pub fn orientation_get(kind: PieceKind, row: usize, col: usize, rotation: u8) -> u8 {
    let shape = &CATALOG[kind.index()];
    let side = shape.side;
    debug_assert!(row < side && col < side, "({row}, {col}) outside {side}x{side} piece");
    debug_assert!(rotation < 4, "rotation {rotation} out of range");
    if row >= side || col >= side {
        return 0;
    }
    let index = match rotation {
        0 => row * side + col,
        1 => (side - col - 1) * side + row,
        2 => (side - row - 1) * side + (side - col - 1),
        3 => col * side + (side - row - 1),
        _ => return 0,
    };
    shape.cells[index]
}

/// Filled cells of one orientation as (row, col, value), relative to the square's top-left.
pub fn filled_cells(kind: PieceKind, rotation: u8) -> impl Iterator<Item = (usize, usize, u8)> {
    let side = kind.side();
    (0..side)
        .flat_map(move |row| (0..side).map(move |col| (row, col)))
        .filter_map(move |(row, col)| {
            let value = orientation_get(kind, row, col, rotation);
            (value != 0).then_some((row, col, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(kind: PieceKind, rotation: u8) -> Vec<u8> {
        let side = kind.side();
        (0..side)
            .flat_map(|row| (0..side).map(move |col| orientation_get(kind, row, col, rotation)))
            .collect()
    }

    #[test]
    fn test_cell_values_match_catalog_index() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.cell_value() as usize, kind.index() + 1);
            assert_eq!(PieceKind::from_cell_value(kind.cell_value()), Some(kind));
            assert!(filled_cells(kind, 0).all(|(_, _, v)| v == kind.cell_value()));
        }
        assert_eq!(PieceKind::from_cell_value(0), None);
        assert_eq!(PieceKind::from_cell_value(8), None);
    }

    #[test]
    fn test_every_kind_has_four_cells_in_every_rotation() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                assert_eq!(filled_cells(kind, rotation).count(), 4, "{} r{}", kind.name(), rotation);
            }
        }
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        // Rotating the rotation-k bitmap by one more step must equal rotation k+1.
        for kind in PieceKind::ALL {
            let side = kind.side();
            let original = bitmap(kind, 0);
            let mut current = original.clone();
            for step in 1..=4u8 {
                let rotated: Vec<u8> = (0..side)
                    .flat_map(|row| (0..side).map(move |col| (row, col)))
                    .map(|(row, col)| current[(side - col - 1) * side + row])
                    .collect();
                assert_eq!(rotated, bitmap(kind, step % 4), "{} step {}", kind.name(), step);
                current = rotated;
            }
            assert_eq!(current, original);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // T points down at rotation 0; one clockwise quarter turn points it left.
        #[rustfmt::skip]
        let expected = vec![
            0, 3, 0,
            3, 3, 0,
            0, 3, 0,
        ];
        assert_eq!(bitmap(PieceKind::T, 1), expected);
    }

    #[test]
    fn test_square_is_rotation_invariant() {
        for rotation in 0..4 {
            assert_eq!(bitmap(PieceKind::O, rotation), vec![2; 4]);
        }
    }
}
