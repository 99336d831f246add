//! Sides for the two special moves that come in a left/right pair.

use std::fmt;

/// Which rook a king castles toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the rook on column 7.
    Short,
    /// Toward the rook on column 0.
    Long,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];

    /// Column an unmoved king must stand on to castle.
    pub const KING_HOME_COL: i8 = 4;

    /// Column of the rook this side castles with.
    #[inline]
    pub const fn rook_col(self) -> i8 {
        match self {
            CastleSide::Short => 7,
            CastleSide::Long => 0,
        }
    }

    /// Column delta of the king: two squares toward the rook.
    #[inline]
    pub const fn king_shift(self) -> i8 {
        match self {
            CastleSide::Short => 2,
            CastleSide::Long => -2,
        }
    }

    /// Column the rook lands on, next to the king's new square.
    #[inline]
    pub const fn rook_target_col(self, king_col: i8) -> i8 {
        let king_target = king_col + self.king_shift();
        match self {
            CastleSide::Short => king_target - 1,
            CastleSide::Long => king_target + 1,
        }
    }

    /// Columns strictly between a king on `king_col` and this side's rook.
    pub fn between(self, king_col: i8) -> std::ops::Range<i8> {
        match self {
            CastleSide::Short => (king_col + 1)..self.rook_col(),
            CastleSide::Long => (self.rook_col() + 1)..king_col,
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastleSide::Short => write!(f, "short"),
            CastleSide::Long => write!(f, "long"),
        }
    }
}

/// Which neighbouring column an en passant capture takes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnPassantSide {
    /// Toward column 0.
    Left,
    /// Toward column 7.
    Right,
}

impl EnPassantSide {
    pub const ALL: [EnPassantSide; 2] = [EnPassantSide::Left, EnPassantSide::Right];

    #[inline]
    pub const fn col_delta(self) -> i8 {
        match self {
            EnPassantSide::Left => -1,
            EnPassantSide::Right => 1,
        }
    }
}

impl fmt::Display for EnPassantSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnPassantSide::Left => write!(f, "left"),
            EnPassantSide::Right => write!(f, "right"),
        }
    }
}
