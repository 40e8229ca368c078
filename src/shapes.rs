#![warn(clippy::all, clippy::pedantic)]

//! The seven piece shapes and the rotation transform.
//!
//! Shapes are stored as occupancy matrices rather than block offsets, so a
//! rotation is a plain matrix transform and the matrix dimensions swap.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Uniform draw over the seven kinds.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    #[must_use]
    pub fn matrix(self) -> ShapeMatrix {
        let rows: &[&[u8]] = match self {
            ShapeKind::I => &[&[1, 1, 1, 1]],
            ShapeKind::O => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            ShapeKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        ShapeMatrix::from_rows(rows)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::O => "O",
            ShapeKind::T => "T",
            ShapeKind::S => "S",
            ShapeKind::Z => "Z",
            ShapeKind::J => "J",
            ShapeKind::L => "L",
        }
    }
}

/// A rectangular grid of occupied/empty flags, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    cells: Vec<Vec<bool>>,
}

impl ShapeMatrix {
    /// Builds a matrix from rows of 0/1 flags.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    #[must_use]
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.iter().map(|&v| v != 0).collect())
            .collect();
        assert!(
            cells.windows(2).all(|w| w[0].len() == w[1].len()),
            "shape rows must have equal length"
        );
        Self { cells }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// `(col, row)` offsets of every filled cell, relative to the top-left corner.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (col, row))
        })
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        rotate(self)
    }
}

/// 90° clockwise rotation: transpose, then reverse each resulting row.
///
/// Does no bounds or collision checking.
#[must_use]
pub fn rotate(matrix: &ShapeMatrix) -> ShapeMatrix {
    let height = matrix.height();
    let cells = (0..matrix.width())
        .map(|col| (0..height).rev().map(|row| matrix.cells[row][col]).collect())
        .collect();
    ShapeMatrix { cells }
}
