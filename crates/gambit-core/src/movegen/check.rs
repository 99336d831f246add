//! Check detection.

use crate::board::Board;
use crate::color::Color;
use crate::square::Square;

use super::raw_moves;

impl Board {
    /// Return `true` if any piece of `by_color` has `square` among its raw moves.
    ///
    /// Raw moves are used so that detecting check never recurses into
    /// self-check filtering. On an empty square a pawn push counts too, so
    /// this only means "attacked" for occupied squares.
    pub fn can_reach(&self, square: Square, by_color: Color) -> bool {
        self.pieces_of(by_color)
            .any(|attacker| raw_moves(self, attacker).contains(&square))
    }

    /// Return `true` if `color`'s king is attacked. A side without a king is never in check.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.can_reach(king, color.flip()))
    }
}
