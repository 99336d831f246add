//! Sliding move generation (bishop, rook, queen).

use crate::board::Board;
use crate::color::Color;
use crate::square::Square;

/// Walk each offset until the edge or a piece.
///
/// Empty squares are added and the walk continues; an enemy square is added
/// and ends the walk; an own piece ends it without being added.
pub fn slide(board: &Board, offsets: &[(i8, i8)], from: Square, color: Color) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(d_row, d_col) in offsets {
        let mut current = from.offset(d_row, d_col);
        while board.is_vacant(current) {
            moves.push(current);
            current = current.offset(d_row, d_col);
        }
        if board.is_enemy(current, color) {
            moves.push(current);
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::slide;
    use crate::board::Board;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn rook_on_empty_board_sees_fourteen_squares() {
        let board = Board::empty();
        let moves = slide(&board, PieceKind::Rook.offsets(), Square::new(3, 3), Color::White);
        assert_eq!(moves.len(), 14);
    }

    #[test]
    fn queen_in_centre_sees_twenty_seven_squares() {
        let board = Board::empty();
        let moves = slide(&board, PieceKind::Queen.offsets(), Square::new(3, 3), Color::Black);
        assert_eq!(moves.len(), 27);
    }

    #[test]
    fn walk_stops_at_first_piece() {
        let mut board = Board::empty();
        let own = Square::new(5, 5);
        let enemy = Square::new(1, 1);
        board
            .place(own, Some(Piece::new(PieceKind::Knight, Color::White, own)))
            .unwrap();
        board
            .place(enemy, Some(Piece::new(PieceKind::Knight, Color::Black, enemy)))
            .unwrap();

        let moves = slide(&board, PieceKind::Bishop.offsets(), Square::new(3, 3), Color::White);
        assert!(moves.contains(&Square::new(4, 4)));
        assert!(!moves.contains(&own));
        assert!(!moves.contains(&Square::new(6, 6)));
        assert!(moves.contains(&Square::new(2, 2)));
        assert!(moves.contains(&enemy));
        assert!(!moves.contains(&Square::new(0, 0)));
    }
}
