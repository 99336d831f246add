//! Pawn move generation and en passant eligibility.

use crate::board::Board;
use crate::castle::EnPassantSide;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Forward pushes (one, or two from the starting row) and diagonal captures.
pub(super) fn pawn_moves(board: &Board, pawn: &Piece) -> Vec<Square> {
    let color = pawn.color();
    let from = pawn.location();
    let forward = color.forward();
    let mut moves = Vec::with_capacity(4);

    let one = from.offset(forward, 0);
    if board.is_vacant(one) {
        moves.push(one);
        let two = one.offset(forward, 0);
        if from.row() == color.pawn_row() && board.is_vacant(two) {
            moves.push(two);
        }
    }

    for d_col in [-1, 1] {
        let diagonal = from.offset(forward, d_col);
        if board.is_enemy(diagonal, color) {
            moves.push(diagonal);
        }
    }

    moves
}

/// Square a pawn lands on when capturing en passant toward `side`.
pub(crate) fn en_passant_landing(pawn: &Piece, side: EnPassantSide) -> Square {
    pawn.location().offset(pawn.color().forward(), side.col_delta())
}

/// Square of the pawn taken by an en passant capture toward `side`.
pub(crate) fn en_passant_victim(pawn: &Piece, side: EnPassantSide) -> Square {
    pawn.location().offset(0, side.col_delta())
}

/// `true` if `pawn` may take the neighbouring pawn on `side` en passant.
///
/// The neighbour must be an enemy pawn inside its one-turn window and the
/// landing square must be empty.
pub(crate) fn en_passant_possible(board: &Board, pawn: &Piece, side: EnPassantSide) -> bool {
    if !pawn.is_kind(PieceKind::Pawn) {
        return false;
    }
    let victim = board.at(en_passant_victim(pawn, side)).is_some_and(|p| {
        p.is_kind(PieceKind::Pawn) && p.color() != pawn.color() && p.is_en_passant_vulnerable()
    });
    victim && board.is_vacant(en_passant_landing(pawn, side))
}

#[cfg(test)]
mod tests {
    use super::{en_passant_possible, pawn_moves};
    use crate::board::Board;
    use crate::castle::EnPassantSide;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn put(board: &mut Board, kind: PieceKind, color: Color, row: i8, col: i8) -> Piece {
        let sq = Square::new(row, col);
        board.place(sq, Some(Piece::new(kind, color, sq))).unwrap();
        *board.occupant(sq).unwrap().unwrap()
    }

    #[test]
    fn unmoved_pawn_can_double_step() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::Black, 1, 2);
        assert_eq!(
            pawn_moves(&board, &pawn),
            vec![Square::new(2, 2), Square::new(3, 2)]
        );
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::White, 6, 0);
        put(&mut board, PieceKind::Knight, Color::Black, 5, 0);
        assert!(pawn_moves(&board, &pawn).is_empty());
    }

    #[test]
    fn double_step_needs_empty_destination() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::White, 6, 0);
        put(&mut board, PieceKind::Knight, Color::White, 4, 0);
        assert_eq!(pawn_moves(&board, &pawn), vec![Square::new(5, 0)]);
    }

    #[test]
    fn captures_only_enemies_diagonally() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::White, 4, 4);
        put(&mut board, PieceKind::Rook, Color::Black, 3, 3);
        put(&mut board, PieceKind::Rook, Color::White, 3, 5);
        assert_eq!(
            pawn_moves(&board, &pawn),
            vec![Square::new(3, 4), Square::new(3, 3)]
        );
    }

    #[test]
    fn pawn_on_last_row_has_no_push() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::White, 0, 4);
        assert!(pawn_moves(&board, &pawn).is_empty());
    }

    #[test]
    fn en_passant_requires_vulnerable_enemy_pawn() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceKind::Pawn, Color::White, 3, 4);
        put(&mut board, PieceKind::Pawn, Color::Black, 3, 5);
        assert!(!en_passant_possible(&board, &pawn, EnPassantSide::Right));

        if let Some(victim) = board.at_mut(Square::new(3, 5)) {
            victim.set_en_passant_vulnerable(true);
        }
        assert!(en_passant_possible(&board, &pawn, EnPassantSide::Right));
        assert!(!en_passant_possible(&board, &pawn, EnPassantSide::Left));

        put(&mut board, PieceKind::Bishop, Color::Black, 2, 5);
        assert!(
            !en_passant_possible(&board, &pawn, EnPassantSide::Right),
            "occupied landing square must block en passant"
        );
    }
}
