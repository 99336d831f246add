//! Castling path checks.

use crate::board::Board;
use crate::castle::CastleSide;
use crate::piece::Piece;
use crate::square::Square;

/// `true` if every square between `king` and the corner on `side` is empty.
///
/// Whether those squares are attacked is not considered.
pub(crate) fn castle_path_clear(board: &Board, king: &Piece, side: CastleSide) -> bool {
    let home = king.location();
    side.between(home.col())
        .all(|col| board.is_vacant(Square::new(home.row(), col)))
}
