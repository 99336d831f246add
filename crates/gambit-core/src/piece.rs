//! A chess piece standing on the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::castle::{CastleSide, EnPassantSide};
use crate::color::Color;
use crate::movegen;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const WHITE_PAWN_OFFSETS: [(i8, i8); 1] = [(-1, 0)];
const BLACK_PAWN_OFFSETS: [(i8, i8); 1] = [(1, 0)];

/// One piece: its kind, its side, where it stands and what it has done.
///
/// The board owns every piece; move generation receives the board as an
/// argument instead of the piece holding a reference to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    location: Square,
    has_moved: bool,
    /// Only ever set on pawns, for the one opposing turn after a double step.
    #[serde(default)]
    en_passant_vulnerable: bool,
}

impl Piece {
    /// Create an unmoved piece at `location`.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, location: Square) -> Piece {
        Piece {
            kind,
            color,
            location,
            has_moved: false,
            en_passant_vulnerable: false,
        }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn location(&self) -> Square {
        self.location
    }

    /// Return `true` once the piece has made a move (castling and promotion count).
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[inline]
    pub const fn is_en_passant_vulnerable(&self) -> bool {
        self.en_passant_vulnerable
    }

    #[inline]
    pub const fn is_kind(&self, kind: PieceKind) -> bool {
        self.kind as u8 == kind as u8
    }

    /// Return a copy with `has_moved` set. Useful when building positions by hand.
    #[inline]
    pub const fn moved(mut self) -> Piece {
        self.has_moved = true;
        self
    }

    #[inline]
    pub(crate) fn set_location(&mut self, location: Square) {
        self.location = location;
    }

    #[inline]
    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Set or clear the en passant window. Has no effect on non-pawns.
    #[inline]
    pub fn set_en_passant_vulnerable(&mut self, vulnerable: bool) {
        self.en_passant_vulnerable = vulnerable && self.kind == PieceKind::Pawn;
    }

    /// The fixed direction offsets of this piece.
    ///
    /// For pawns this is the single forward step, which depends on color.
    pub fn movement_offsets(&self) -> &'static [(i8, i8)] {
        match (self.kind, self.color) {
            (PieceKind::Pawn, Color::White) => &WHITE_PAWN_OFFSETS,
            (PieceKind::Pawn, Color::Black) => &BLACK_PAWN_OFFSETS,
            (kind, _) => kind.offsets(),
        }
    }

    /// Squares this piece could reach, ignoring whether its own king ends up attacked.
    pub fn raw_moves(&self, board: &Board) -> Vec<Square> {
        movegen::raw_moves(board, self)
    }

    /// The raw moves that do not leave this piece's king in check.
    pub fn safe_moves(&self, board: &Board) -> Vec<Square> {
        movegen::safe_moves(board, self)
    }

    /// For a king: `true` if nothing stands between it and the short-side corner.
    pub fn short_castle_possible(&self, board: &Board) -> bool {
        self.is_kind(PieceKind::King) && movegen::castle_path_clear(board, self, CastleSide::Short)
    }

    /// For a king: `true` if nothing stands between it and the long-side corner.
    pub fn long_castle_possible(&self, board: &Board) -> bool {
        self.is_kind(PieceKind::King) && movegen::castle_path_clear(board, self, CastleSide::Long)
    }

    /// For a pawn: `true` if the pawn on its left may be taken en passant.
    pub fn en_passant_left_possible(&self, board: &Board) -> bool {
        movegen::en_passant_possible(board, self, EnPassantSide::Left)
    }

    /// For a pawn: `true` if the pawn on its right may be taken en passant.
    pub fn en_passant_right_possible(&self, board: &Board) -> bool {
        movegen::en_passant_possible(board, self, EnPassantSide::Right)
    }

    /// Printable glyph for this kind and color.
    pub const fn to_display_symbol(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::King) => '♔',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::Black, PieceKind::King) => '♚',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Pawn) => '♟',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_symbol())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color_prefix = match self.color {
            Color::White => 'W',
            Color::Black => 'B',
        };
        let kind_char = self.kind.letter().to_ascii_uppercase();
        write!(f, "{color_prefix}{kind_char}@{}", self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::Piece;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn new_piece_is_unmoved() {
        let piece = Piece::new(PieceKind::Rook, Color::Black, Square::new(0, 0));
        assert_eq!(piece.kind(), PieceKind::Rook);
        assert_eq!(piece.color(), Color::Black);
        assert_eq!(piece.location(), Square::new(0, 0));
        assert!(!piece.has_moved());
        assert!(!piece.is_en_passant_vulnerable());
        assert!(piece.moved().has_moved());
    }

    #[test]
    fn en_passant_flag_only_sticks_to_pawns() {
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White, Square::new(4, 4));
        pawn.set_en_passant_vulnerable(true);
        assert!(pawn.is_en_passant_vulnerable());

        let mut knight = Piece::new(PieceKind::Knight, Color::White, Square::new(4, 4));
        knight.set_en_passant_vulnerable(true);
        assert!(!knight.is_en_passant_vulnerable());
    }

    #[test]
    fn pawn_offsets_depend_on_color() {
        let white = Piece::new(PieceKind::Pawn, Color::White, Square::new(6, 0));
        let black = Piece::new(PieceKind::Pawn, Color::Black, Square::new(1, 0));
        assert_eq!(white.movement_offsets(), &[(-1, 0)]);
        assert_eq!(black.movement_offsets(), &[(1, 0)]);
    }

    #[test]
    fn display_symbols() {
        let sq = Square::new(0, 0);
        assert_eq!(Piece::new(PieceKind::King, Color::White, sq).to_display_symbol(), '♔');
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Black, sq).to_display_symbol(), '♟');
        assert_eq!(format!("{}", Piece::new(PieceKind::Queen, Color::Black, sq)), "♛");
    }

    #[test]
    fn debug_format() {
        let piece = Piece::new(PieceKind::Knight, Color::White, Square::new(7, 1));
        assert_eq!(format!("{piece:?}"), "WN@B1");
    }
}
