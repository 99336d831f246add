//! The 8x8 grid: piece placement, move execution and self-check simulation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{BoardError, RulesError};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Back-rank layout from column 0 to column 7.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// What an ordinary move did besides relocating the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Kind of the piece removed from the destination, if any.
    pub captured: Option<PieceKind>,
    /// Set when a pawn reached its last row and must be promoted.
    pub promotion: Option<Square>,
}

/// The grid of optional pieces. Owns every piece on it.
///
/// The board is `Copy`: simulations run against a private copy, so the live
/// grid is never touched by a lookahead.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Return a board with no pieces.
    pub const fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
        }
    }

    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            for (col, kind) in (0i8..).zip(BACK_RANK) {
                let sq = Square::new(color.back_row(), col);
                board.put(sq, Piece::new(kind, color, sq));
                let sq = Square::new(color.pawn_row(), col);
                board.put(sq, Piece::new(PieceKind::Pawn, color, sq));
            }
        }
        board
    }

    /// Return `true` if `square` lies on the grid.
    #[inline]
    pub fn in_bounds(&self, square: Square) -> bool {
        square.in_bounds()
    }

    /// Return the piece on `square`, if any.
    ///
    /// # Errors
    ///
    /// [`RulesError::OutOfBounds`] if `square` is off the grid.
    pub fn occupant(&self, square: Square) -> Result<Option<&Piece>, RulesError> {
        let (row, col) = square
            .indices()
            .ok_or(RulesError::OutOfBounds { square })?;
        Ok(self.grid[row][col].as_ref())
    }

    /// Write `piece` (or nothing) to `square`, returning the previous occupant.
    ///
    /// No legality check is made. A placed piece has its location set to `square`.
    ///
    /// # Errors
    ///
    /// [`RulesError::OutOfBounds`] if `square` is off the grid.
    pub fn place(
        &mut self,
        square: Square,
        piece: Option<Piece>,
    ) -> Result<Option<Piece>, RulesError> {
        let slot = self.slot_mut(square).ok_or(RulesError::OutOfBounds { square })?;
        let previous = slot.take();
        *slot = piece.map(|mut p| {
            p.set_location(square);
            p
        });
        Ok(previous)
    }

    /// Every piece on the board, in row-major order.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.grid.iter().flatten().flatten()
    }

    /// Every piece of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.all_pieces().filter(move |p| p.color() == color)
    }

    /// Return `true` if `square` holds a piece whose color differs from `color`.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.at(square).is_some_and(|p| p.color() != color)
    }

    /// Return `true` if `square` is on the grid and unoccupied.
    pub fn is_vacant(&self, square: Square) -> bool {
        square.in_bounds() && self.at(square).is_none()
    }

    /// Return the square of `color`'s king, if it has one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|p| p.is_kind(PieceKind::King))
            .map(Piece::location)
    }

    /// Move the piece on `from` to `to` after checking `to` is one of its safe moves.
    ///
    /// A pawn reaching its last row is reported in [`MoveOutcome::promotion`];
    /// a pawn that double-stepped off its starting row becomes en passant
    /// vulnerable.
    ///
    /// # Errors
    ///
    /// - [`RulesError::OutOfBounds`] if either square is off the grid.
    /// - [`RulesError::EmptySquare`] if nothing stands on `from`.
    /// - [`RulesError::IllegalMove`] if `to` is not a safe move.
    pub fn execute_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, RulesError> {
        let piece = *self
            .occupant(from)?
            .ok_or(RulesError::EmptySquare { square: from })?;
        self.occupant(to)?;

        let valid = piece.safe_moves(self);
        if !valid.contains(&to) {
            return Err(RulesError::IllegalMove { from, to, valid });
        }

        let captured = self.relocate(from, to).map(|p| p.kind());
        let mut promotion = None;
        if let Some(moved) = self.at_mut(to) {
            moved.mark_moved();
            if moved.is_kind(PieceKind::Pawn) {
                let color = moved.color();
                if to.row() == color.promotion_row() {
                    promotion = Some(to);
                } else if from.row() == color.pawn_row() && (to.row() - from.row()).abs() == 2 {
                    moved.set_en_passant_vulnerable(true);
                }
            }
        }

        debug!(
            piece = ?piece.kind(),
            color = %piece.color(),
            %from,
            %to,
            captured = ?captured,
            "executed move"
        );
        Ok(MoveOutcome {
            captured,
            promotion,
        })
    }

    /// Return `true` if moving the piece on `from` to `to` leaves `color`'s king in check.
    ///
    /// Works on a copy of the grid, so the board is identical before and after
    /// the call whatever the destination held.
    pub fn simulate_move(&self, from: Square, to: Square, color: Color) -> bool {
        let mut scratch = *self;
        scratch.relocate(from, to);
        scratch.in_check(color)
    }

    /// Clear the en passant window of every pawn of `color`.
    pub fn clear_en_passant(&mut self, color: Color) {
        for piece in self.grid.iter_mut().flatten().flatten() {
            if piece.color() == color {
                piece.set_en_passant_vulnerable(false);
            }
        }
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self
                .pieces_of(color)
                .filter(|p| p.is_kind(PieceKind::King))
                .count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        for square in Square::all() {
            let Some(piece) = self.at(square) else {
                continue;
            };
            if piece.location() != square {
                return Err(BoardError::MisplacedPiece {
                    square,
                    recorded: piece.location(),
                });
            }
            if piece.is_kind(PieceKind::Pawn) && (square.row() == 0 || square.row() == 7) {
                return Err(BoardError::PawnOnBackRank { square });
            }
            if !piece.is_kind(PieceKind::Pawn) && piece.is_en_passant_vulnerable() {
                return Err(BoardError::StrayEnPassantFlag { square });
            }
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this board.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }

    /// The piece on `square`; `None` when empty or off the grid.
    #[inline]
    pub(crate) fn at(&self, square: Square) -> Option<&Piece> {
        let (row, col) = square.indices()?;
        self.grid[row][col].as_ref()
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.slot_mut(square)?.as_mut()
    }

    #[inline]
    fn slot_mut(&mut self, square: Square) -> Option<&mut Option<Piece>> {
        let (row, col) = square.indices()?;
        Some(&mut self.grid[row][col])
    }

    /// Remove and return the piece on `square`; `None` when empty or off the grid.
    #[inline]
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square)?.take()
    }

    fn put(&mut self, square: Square, piece: Piece) {
        if let Some(slot) = self.slot_mut(square) {
            *slot = Some(piece);
        }
    }

    /// Lift the piece off `from` and set it down on `to`, returning whatever `to` held.
    ///
    /// Does nothing when `from` is empty or either square is off the grid.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        if !to.in_bounds() {
            return None;
        }
        let mut piece = self.slot_mut(from)?.take()?;
        piece.set_location(to);
        self.slot_mut(to)?.replace(piece)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        writeln!(f, "{}", self.pretty())?;
        write!(f, ")")
    }
}

/// Wrapper for pretty-printing a board as an 8x8 grid of glyphs.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        for row in 0..Square::SIDE {
            write!(f, "{}  ", Square::SIDE - row)?;
            for col in 0..Square::SIDE {
                let c = board
                    .at(Square::new(row, col))
                    .map_or('·', Piece::to_display_symbol);
                if col < Square::SIDE - 1 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   A B C D E F G H")
    }
}
