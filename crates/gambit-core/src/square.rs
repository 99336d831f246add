//! Grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A (row, column) coordinate on the 8x8 grid.
///
/// Row 0 is the eighth rank (Black's side) and column 0 is the a-file, so
/// `Square::new(7, 4)` is e1. A square is a plain value and may lie off the
/// grid; [`Square::in_bounds`] tells the two apart and the board rejects
/// off-grid squares rather than clamping them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    row: i8,
    col: i8,
}

impl Square {
    /// Number of rows (and columns) on the grid.
    pub const SIDE: i8 = 8;

    /// Create a square from a row and a column. No bounds check is performed.
    #[inline]
    pub const fn new(row: i8, col: i8) -> Square {
        Square { row, col }
    }

    #[inline]
    pub const fn row(self) -> i8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> i8 {
        self.col
    }

    /// Return `true` if both coordinates lie in `0..8`.
    #[inline]
    pub const fn in_bounds(self) -> bool {
        self.row >= 0 && self.row < Self::SIDE && self.col >= 0 && self.col < Self::SIDE
    }

    /// Return the square displaced by `(d_row, d_col)`.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Square {
        Square::new(self.row + d_row, self.col + d_col)
    }

    /// Grid indices for an in-bounds square.
    #[inline]
    pub(crate) fn indices(self) -> Option<(usize, usize)> {
        self.in_bounds()
            .then_some((self.row as usize, self.col as usize))
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::SIDE).flat_map(|row| (0..Self::SIDE).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_bounds() {
            let file = (b'A' + self.col as u8) as char;
            let rank = Self::SIDE - self.row;
            write!(f, "{file}{rank}")
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.row, self.col)
    }
}

impl From<(i8, i8)> for Square {
    fn from((row, col): (i8, i8)) -> Square {
        Square::new(row, col)
    }
}
