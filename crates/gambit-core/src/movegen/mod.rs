//! Move generation: the two shared strategies, pawn rules, and self-check filtering.
//!
//! A piece kind selects its algorithm through [`PieceKind::strategy`]; the
//! board is always passed in rather than stored in the piece.

mod check;
mod king;
mod pawns;
mod sliding;
mod stepping;

use tracing::trace;

use crate::board::Board;
use crate::piece::Piece;
use crate::piece_kind::Strategy;
use crate::square::Square;

pub(crate) use self::king::castle_path_clear;
pub(crate) use self::pawns::{en_passant_landing, en_passant_possible, en_passant_victim};
pub use self::sliding::slide;
pub use self::stepping::step;

/// Every destination `piece` could reach, ignoring self-check.
pub fn raw_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    let from = piece.location();
    match piece.kind().strategy() {
        Strategy::Stepping => step(board, piece.movement_offsets(), from, piece.color()),
        Strategy::Sliding => slide(board, piece.movement_offsets(), from, piece.color()),
        Strategy::Pawn => pawns::pawn_moves(board, piece),
    }
}

/// The raw moves of `piece` that do not leave its own king in check.
pub fn safe_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    let from = piece.location();
    raw_moves(board, piece)
        .into_iter()
        .filter(|&to| {
            let exposes_king = board.simulate_move(from, to, piece.color());
            if exposes_king {
                trace!(%from, %to, "rejected: leaves own king in check");
            }
            !exposes_king
        })
        .collect()
}
