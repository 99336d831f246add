//! Error types for rule enforcement and board validation.

use crate::castle::{CastleSide, EnPassantSide};
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

fn describe(found: &Option<PieceKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "an empty square".to_string(),
    }
}

fn list(squares: &[Square]) -> String {
    if squares.is_empty() {
        return "none".to_string();
    }
    squares
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while validating or executing a move.
///
/// None of these leave the board modified: every check runs before the
/// first write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// A square outside the 8x8 grid was used.
    #[error("square {square} is off the board")]
    OutOfBounds {
        /// The offending square.
        square: Square,
    },

    /// No piece stands on the selected square.
    #[error("location {square} is empty")]
    EmptySquare {
        /// The selected square.
        square: Square,
    },

    /// The selected piece belongs to the side not on move.
    #[error("piece at {square} is {color} but it is {to_move}'s turn")]
    NotYourPiece {
        /// The selected square.
        square: Square,
        /// Color of the piece found there.
        color: Color,
        /// Color of the side to move.
        to_move: Color,
    },

    /// The selected piece has nothing it may do this turn.
    #[error("piece at {square} has no valid moves")]
    NoLegalMoves {
        /// The selected square.
        square: Square,
    },

    /// The destination is not among the piece's safe moves.
    #[error("{to} is not a valid destination from {from}; valid moves: {}", list(.valid))]
    IllegalMove {
        /// Where the piece stands.
        from: Square,
        /// The rejected destination.
        to: Square,
        /// Every destination that would have been accepted.
        valid: Vec<Square>,
    },

    /// Castling toward `side` is not currently allowed.
    #[error("{side} castling is not available for the king at {king}")]
    CastleUnavailable {
        /// The king's square.
        king: Square,
        /// The requested side.
        side: CastleSide,
    },

    /// The squares involved in a castle do not hold a king and a rook.
    #[error(
        "expected a King at {king} and a Rook at {rook}, found {} and {}",
        describe(.king_found),
        describe(.rook_found)
    )]
    InvalidCastleTarget {
        /// Where the king was expected.
        king: Square,
        /// Where the rook was expected.
        rook: Square,
        /// What actually stands on `king`.
        king_found: Option<PieceKind>,
        /// What actually stands on `rook`.
        rook_found: Option<PieceKind>,
    },

    /// A square the king or rook would land on while castling is taken.
    #[error("cannot castle onto {square}: it holds a {found}")]
    CastleTargetOccupied {
        /// The landing square.
        square: Square,
        /// What stands there.
        found: PieceKind,
    },

    /// En passant toward `side` is not currently allowed.
    #[error("{side} en passant is not available for the pawn at {pawn}")]
    EnPassantUnavailable {
        /// The capturing pawn's square.
        pawn: Square,
        /// The requested side.
        side: EnPassantSide,
    },

    /// The square used for en passant does not hold a pawn.
    #[error("expected a Pawn at {square}, found {}", describe(.found))]
    InvalidEnPassantTarget {
        /// The square that should hold a pawn.
        square: Square,
        /// What actually stands there.
        found: Option<PieceKind>,
    },

    /// A pawn may only become a Queen, Rook, Knight or Bishop.
    #[error("cannot promote to {kind}; choose Queen, Rook, Knight or Bishop")]
    InvalidPromotionChoice {
        /// The rejected kind.
        kind: PieceKind,
    },

    /// Promotion was requested for a square without a pawn.
    #[error("expected a Pawn to promote at {square}, found {}", describe(.found))]
    InvalidPromotionTarget {
        /// The square that should hold a pawn.
        square: Square,
        /// What actually stands there.
        found: Option<PieceKind>,
    },

    /// The game has already ended.
    #[error("the game is over")]
    GameOver,
}

impl RulesError {
    /// Return `true` for errors the player fixes by choosing again.
    ///
    /// The rest point at inconsistent state upstream and abort the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RulesError::EmptySquare { .. }
                | RulesError::NotYourPiece { .. }
                | RulesError::NoLegalMoves { .. }
                | RulesError::IllegalMove { .. }
                | RulesError::CastleUnavailable { .. }
                | RulesError::EnPassantUnavailable { .. }
                | RulesError::InvalidPromotionChoice { .. }
        )
    }
}

/// Errors from structural validation of a [`Board`](crate::board::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount {
        /// Which side has the wrong king count.
        color: Color,
        /// Number of kings found.
        count: usize,
    },
    /// A pawn stands on a back rank outside of a pending promotion.
    #[error("pawn found on back rank at {square}")]
    PawnOnBackRank {
        /// Where the pawn stands.
        square: Square,
    },
    /// A piece's recorded location disagrees with the square holding it.
    #[error("piece on {square} records its location as {recorded}")]
    MisplacedPiece {
        /// The square holding the piece.
        square: Square,
        /// The location stored in the piece.
        recorded: Square,
    },
    /// Only pawns may carry the en passant flag.
    #[error("non-pawn at {square} is marked en passant vulnerable")]
    StrayEnPassantFlag {
        /// Where the piece stands.
        square: Square,
    },
}

/// Errors from restoring a [`GameSnapshot`](crate::game::GameSnapshot).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Players must be listed White first, then Black.
    #[error("player {name} is listed as {expected} but records another color")]
    PlayerColor {
        /// The player's name.
        name: String,
        /// The color of the slot the player occupies.
        expected: Color,
    },
    /// The saved board fails structural validation.
    #[error("invalid board: {source}")]
    Board {
        /// The underlying validation error.
        #[from]
        source: BoardError,
    },
}
