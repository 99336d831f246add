//! Special moves: castling, en passant and promotion.
//!
//! These sit on top of [`Board`] and use its raw placement primitives once
//! the participants have been checked.

use tracing::debug;

use crate::board::Board;
use crate::castle::{CastleSide, EnPassantSide};
use crate::error::RulesError;
use crate::movegen::{en_passant_landing, en_passant_possible, en_passant_victim};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

impl Board {
    /// Return `true` if the king on `king_sq` may castle toward `side`.
    ///
    /// The king must be unmoved on its home square, the corner on that side
    /// must hold an unmoved rook of the same color, and the squares between
    /// must be empty. Squares the king passes over are not tested for attacks.
    pub fn castle_available(&self, king_sq: Square, side: CastleSide) -> bool {
        let Some(king) = self.at(king_sq) else {
            return false;
        };
        if !king.is_kind(PieceKind::King) || king.has_moved() {
            return false;
        }
        let home = Square::new(king.color().back_row(), CastleSide::KING_HOME_COL);
        if king_sq != home {
            return false;
        }
        let rook_sq = Square::new(king_sq.row(), side.rook_col());
        let rook_ready = self.at(rook_sq).is_some_and(|rook| {
            rook.is_kind(PieceKind::Rook) && rook.color() == king.color() && !rook.has_moved()
        });
        let path_clear = match side {
            CastleSide::Short => king.short_castle_possible(self),
            CastleSide::Long => king.long_castle_possible(self),
        };
        rook_ready && path_clear
    }

    /// Return `true` if the king on `king_sq` may castle toward either side.
    pub fn can_castle(&self, king_sq: Square) -> bool {
        CastleSide::ALL
            .into_iter()
            .any(|side| self.castle_available(king_sq, side))
    }

    /// Move the king two squares toward the `side` rook and the rook next to it.
    ///
    /// Eligibility is not re-checked here; see [`Board::castle_available`].
    ///
    /// # Errors
    ///
    /// - [`RulesError::OutOfBounds`] if `king_sq` or a landing square is off the grid.
    /// - [`RulesError::InvalidCastleTarget`] if the squares do not hold a king
    ///   and a rook.
    /// - [`RulesError::CastleTargetOccupied`] if the king or rook would land on
    ///   a piece.
    pub fn execute_castle(&mut self, king_sq: Square, side: CastleSide) -> Result<(), RulesError> {
        let king_found = self.occupant(king_sq)?.map(Piece::kind);
        let rook_sq = Square::new(king_sq.row(), side.rook_col());
        let rook_found = self.at(rook_sq).map(Piece::kind);
        if king_found != Some(PieceKind::King) || rook_found != Some(PieceKind::Rook) {
            return Err(RulesError::InvalidCastleTarget {
                king: king_sq,
                rook: rook_sq,
                king_found,
                rook_found,
            });
        }

        let king_to = king_sq.offset(0, side.king_shift());
        let rook_to = Square::new(king_sq.row(), side.rook_target_col(king_sq.col()));
        for square in [king_to, rook_to] {
            if let Some(found) = self.occupant(square)? {
                return Err(RulesError::CastleTargetOccupied {
                    square,
                    found: found.kind(),
                });
            }
        }
        self.relocate(king_sq, king_to);
        self.relocate(rook_sq, rook_to);
        for sq in [king_to, rook_to] {
            if let Some(piece) = self.at_mut(sq) {
                piece.mark_moved();
            }
        }

        debug!(%side, king = %king_to, rook = %rook_to, "castled");
        Ok(())
    }

    /// Return `true` if the pawn on `pawn_sq` may capture en passant toward either side.
    pub fn can_en_passant(&self, pawn_sq: Square) -> bool {
        self.at(pawn_sq).is_some_and(|pawn| {
            pawn.en_passant_left_possible(self) || pawn.en_passant_right_possible(self)
        })
    }

    /// Return `true` if the pawn on `pawn_sq` may capture en passant toward `side`.
    pub fn en_passant_available(&self, pawn_sq: Square, side: EnPassantSide) -> bool {
        self.at(pawn_sq)
            .is_some_and(|pawn| en_passant_possible(self, pawn, side))
    }

    /// Return `true` if capturing en passant toward `side` would leave the
    /// capturer's king in check.
    pub fn en_passant_exposes_king(&self, pawn_sq: Square, side: EnPassantSide) -> bool {
        let Some(pawn) = self.at(pawn_sq).copied() else {
            return false;
        };
        let mut scratch = *self;
        scratch.take(en_passant_victim(&pawn, side));
        scratch.relocate(pawn_sq, en_passant_landing(&pawn, side));
        scratch.in_check(pawn.color())
    }

    /// Move the pawn diagonally into the empty landing square and remove the
    /// enemy pawn beside it. Returns the square the captured pawn stood on.
    ///
    /// # Errors
    ///
    /// - [`RulesError::OutOfBounds`] if `pawn_sq` or the landing square is off the grid.
    /// - [`RulesError::InvalidEnPassantTarget`] if `pawn_sq` or the captured
    ///   square does not hold a pawn.
    pub fn execute_en_passant(
        &mut self,
        pawn_sq: Square,
        side: EnPassantSide,
    ) -> Result<Square, RulesError> {
        let found = self.occupant(pawn_sq)?.copied();
        let pawn = match found {
            Some(pawn) if pawn.is_kind(PieceKind::Pawn) => pawn,
            other => {
                return Err(RulesError::InvalidEnPassantTarget {
                    square: pawn_sq,
                    found: other.map(|p| p.kind()),
                });
            }
        };

        let victim = en_passant_victim(&pawn, side);
        let landing = en_passant_landing(&pawn, side);
        self.occupant(landing)?;
        let victim_kind = self.occupant(victim)?.map(Piece::kind);
        if victim_kind != Some(PieceKind::Pawn) {
            return Err(RulesError::InvalidEnPassantTarget {
                square: victim,
                found: victim_kind,
            });
        }

        self.take(victim);
        self.relocate(pawn_sq, landing);
        if let Some(moved) = self.at_mut(landing) {
            moved.mark_moved();
        }

        debug!(%side, from = %pawn_sq, to = %landing, captured = %victim, "en passant");
        Ok(victim)
    }

    /// Replace the pawn on `square` with a new piece of `kind`, same color, already moved.
    ///
    /// # Errors
    ///
    /// - [`RulesError::InvalidPromotionChoice`] unless `kind` is Queen, Rook,
    ///   Knight or Bishop.
    /// - [`RulesError::OutOfBounds`] if `square` is off the grid.
    /// - [`RulesError::InvalidPromotionTarget`] if `square` holds no pawn.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<(), RulesError> {
        if !kind.is_promotion_target() {
            return Err(RulesError::InvalidPromotionChoice { kind });
        }
        let pawn = match self.occupant(square)?.copied() {
            Some(pawn) if pawn.is_kind(PieceKind::Pawn) => pawn,
            other => {
                return Err(RulesError::InvalidPromotionTarget {
                    square,
                    found: other.map(|p| p.kind()),
                });
            }
        };

        let promoted = Piece::new(kind, pawn.color(), square).moved();
        self.place(square, Some(promoted))?;
        debug!(%square, %kind, color = %pawn.color(), "promoted pawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::castle::{CastleSide, EnPassantSide};
    use crate::color::Color;
    use crate::error::RulesError;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col)
    }

    fn put(board: &mut Board, kind: PieceKind, color: Color, row: i8, col: i8) {
        board
            .place(sq(row, col), Some(Piece::new(kind, color, sq(row, col))))
            .unwrap();
    }

    fn kind_at(board: &Board, row: i8, col: i8) -> Option<PieceKind> {
        board.occupant(sq(row, col)).unwrap().map(|p| p.kind())
    }

    fn castling_board() -> Board {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 4);
        put(&mut board, PieceKind::Rook, Color::White, 7, 0);
        put(&mut board, PieceKind::Rook, Color::White, 7, 7);
        board
    }

    #[test]
    fn long_castle_moves_king_and_rook() {
        let mut board = castling_board();
        assert!(board.castle_available(sq(7, 4), CastleSide::Long));
        board.execute_castle(sq(7, 4), CastleSide::Long).unwrap();
        assert_eq!(kind_at(&board, 7, 2), Some(PieceKind::King));
        assert_eq!(kind_at(&board, 7, 3), Some(PieceKind::Rook));
        assert_eq!(kind_at(&board, 7, 0), None);
        assert_eq!(kind_at(&board, 7, 4), None);
        assert!(board.occupant(sq(7, 3)).unwrap().unwrap().has_moved());
    }

    #[test]
    fn moved_rook_blocks_only_its_side() {
        let mut board = castling_board();
        let rook = board.place(sq(7, 7), None).unwrap().map(Piece::moved);
        board.place(sq(7, 7), rook).unwrap();
        assert!(!board.castle_available(sq(7, 4), CastleSide::Short));
        assert!(board.castle_available(sq(7, 4), CastleSide::Long));
        assert!(board.can_castle(sq(7, 4)));
    }

    #[test]
    fn moved_king_cannot_castle() {
        let mut board = castling_board();
        let king = board.place(sq(7, 4), None).unwrap().map(Piece::moved);
        board.place(sq(7, 4), king).unwrap();
        assert!(!board.can_castle(sq(7, 4)));
    }

    #[test]
    fn castling_ignores_attacked_path() {
        // Known deviation: only occupancy of the path is checked.
        let mut board = castling_board();
        put(&mut board, PieceKind::Rook, Color::Black, 0, 5);
        assert!(board.castle_available(sq(7, 4), CastleSide::Short));
    }

    #[test]
    fn castle_without_rook_is_rejected() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 4);
        put(&mut board, PieceKind::Knight, Color::White, 7, 7);
        let before = board;
        assert_eq!(
            board.execute_castle(sq(7, 4), CastleSide::Short),
            Err(RulesError::InvalidCastleTarget {
                king: sq(7, 4),
                rook: sq(7, 7),
                king_found: Some(PieceKind::King),
                rook_found: Some(PieceKind::Knight),
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn king_off_its_home_square_cannot_castle() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 5);
        put(&mut board, PieceKind::Rook, Color::White, 7, 7);
        assert!(!board.castle_available(sq(7, 5), CastleSide::Short));
        assert!(!board.can_castle(sq(7, 5)));

        let before = board;
        assert_eq!(
            board.execute_castle(sq(7, 5), CastleSide::Short),
            Err(RulesError::CastleTargetOccupied {
                square: sq(7, 7),
                found: PieceKind::Rook,
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn castle_onto_a_piece_leaves_the_board_alone() {
        let mut board = castling_board();
        put(&mut board, PieceKind::Bishop, Color::White, 7, 6);
        let before = board;
        assert_eq!(
            board.execute_castle(sq(7, 4), CastleSide::Short),
            Err(RulesError::CastleTargetOccupied {
                square: sq(7, 6),
                found: PieceKind::Bishop,
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_left_capture() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::Pawn, Color::Black, 4, 5);
        put(&mut board, PieceKind::Pawn, Color::White, 4, 4);
        if let Some(pawn) = board.at_mut(sq(4, 4)) {
            pawn.set_en_passant_vulnerable(true);
        }
        assert!(board.can_en_passant(sq(4, 5)));
        assert!(board.en_passant_available(sq(4, 5), EnPassantSide::Left));

        let captured = board.execute_en_passant(sq(4, 5), EnPassantSide::Left).unwrap();
        assert_eq!(captured, sq(4, 4));
        assert_eq!(kind_at(&board, 4, 4), None);
        assert_eq!(kind_at(&board, 5, 4), Some(PieceKind::Pawn));
        assert_eq!(kind_at(&board, 4, 5), None);
    }

    #[test]
    fn en_passant_needs_a_pawn() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::Bishop, Color::White, 3, 2);
        assert!(!board.can_en_passant(sq(3, 2)));
        assert_eq!(
            board.execute_en_passant(sq(3, 2), EnPassantSide::Right),
            Err(RulesError::InvalidEnPassantTarget {
                square: sq(3, 2),
                found: Some(PieceKind::Bishop),
            })
        );
    }

    #[test]
    fn en_passant_discovered_check_is_detected() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 3, 0);
        put(&mut board, PieceKind::Pawn, Color::White, 3, 1);
        put(&mut board, PieceKind::Pawn, Color::Black, 3, 2);
        put(&mut board, PieceKind::Rook, Color::Black, 3, 7);
        if let Some(pawn) = board.at_mut(sq(3, 2)) {
            pawn.set_en_passant_vulnerable(true);
        }
        assert!(board.en_passant_available(sq(3, 1), EnPassantSide::Right));
        assert!(board.en_passant_exposes_king(sq(3, 1), EnPassantSide::Right));
    }

    #[test]
    fn promote_rejects_king_and_pawn() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::Pawn, Color::Black, 7, 3);
        for kind in [PieceKind::King, PieceKind::Pawn] {
            assert_eq!(
                board.promote(sq(7, 3), kind),
                Err(RulesError::InvalidPromotionChoice { kind })
            );
        }
        board.promote(sq(7, 3), PieceKind::Knight).unwrap();
        let knight = board.occupant(sq(7, 3)).unwrap().unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert_eq!(knight.color(), Color::Black);
        assert!(knight.has_moved());
    }

    #[test]
    fn promote_requires_a_pawn() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::Rook, Color::White, 0, 0);
        assert_eq!(
            board.promote(sq(0, 0), PieceKind::Queen),
            Err(RulesError::InvalidPromotionTarget {
                square: sq(0, 0),
                found: Some(PieceKind::Rook),
            })
        );
    }
}
