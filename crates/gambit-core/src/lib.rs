//! Chess rules core: board state, legal move generation, check and
//! end-of-game detection, castling, en passant and promotion.

mod board;
mod castle;
mod color;
mod error;
mod game;
pub mod movegen;
mod piece;
mod piece_kind;
mod rules;
mod square;

pub use board::{Board, MoveOutcome, PrettyBoard};
pub use castle::{CastleSide, EnPassantSide};
pub use color::Color;
pub use error::{BoardError, RulesError, SnapshotError};
pub use game::{
    Game, GameSnapshot, GameState, MoveRequest, Outcome, Player, PromotionChooser, TurnReport,
};
pub use piece::Piece;
pub use piece_kind::{PieceKind, Strategy};
pub use square::Square;
