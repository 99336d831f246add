//! Turn control: alternating sides, validating requests, detecting the end of the game.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::Board;
use crate::castle::{CastleSide, EnPassantSide};
use crate::color::Color;
use crate::error::{RulesError, SnapshotError};
use crate::movegen::en_passant_landing;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A participant: a display name bound to a color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: Color,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color) -> Player {
        Player {
            name: name.into(),
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move is in check and has no safe move.
    Checkmate { winner: Color },
    /// The side to move is not in check and has no safe move.
    Stalemate,
    /// A side resigned.
    Forfeit { winner: Color },
}

impl Outcome {
    /// The winning color, or `None` for a draw.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Forfeit { winner } => Some(winner),
            Outcome::Stalemate => None,
        }
    }
}

/// Where the turn state machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingMove,
    Terminal(Outcome),
}

/// A move the side to move asks to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    /// An ordinary move to one of the piece's safe moves.
    Move { from: Square, to: Square },
    /// Castle the king on `king` toward `side`.
    Castle { king: Square, side: CastleSide },
    /// Capture en passant with the pawn on `pawn` toward `side`.
    EnPassant { pawn: Square, side: EnPassantSide },
}

impl MoveRequest {
    /// The square of the piece making the move.
    pub fn origin(self) -> Square {
        match self {
            MoveRequest::Move { from, .. } => from,
            MoveRequest::Castle { king, .. } => king,
            MoveRequest::EnPassant { pawn, .. } => pawn,
        }
    }
}

/// Supplies the replacement for a pawn that reached its last row.
///
/// [`Game::play`] keeps asking until the answer is a Queen, Rook, Knight or
/// Bishop; each rejected answer is reported through [`rejected`](Self::rejected).
pub trait PromotionChooser {
    fn choose(&mut self, square: Square, color: Color) -> PieceKind;

    fn rejected(&mut self, _error: &RulesError) {}
}

impl<F> PromotionChooser for F
where
    F: FnMut(Square, Color) -> PieceKind,
{
    fn choose(&mut self, square: Square, color: Color) -> PieceKind {
        self(square, color)
    }
}

/// Summary of a completed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// Side that moved.
    pub mover: Color,
    /// Kind of the piece captured this turn.
    pub captured: Option<PieceKind>,
    /// Kind the pawn was promoted to.
    pub promoted: Option<PieceKind>,
    /// Whether the side now to move is in check.
    pub check: bool,
    /// State after the turn.
    pub state: GameState,
}

/// Plain serializable copy of a session: the grid, both players, whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub players: [Player; 2],
    pub current_player: Color,
}

/// One game session. Owns its board exclusively.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: [Player; 2],
    current: Color,
    state: GameState,
}

impl Game {
    /// Start a game from the standard position with White to move.
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Game {
        let players = [Player::new(white, Color::White), Player::new(black, Color::Black)];
        Game::from_board(Board::starting_position(), players, Color::White)
    }

    /// Start a game from an arbitrary position.
    ///
    /// `players[0]` plays White and `players[1]` Black. The terminal state is
    /// evaluated immediately for `to_move`.
    pub fn from_board(board: Board, players: [Player; 2], to_move: Color) -> Game {
        let mut game = Game {
            board,
            players,
            current: to_move,
            state: GameState::AwaitingMove,
        };
        game.state = game.evaluate();
        game
    }

    /// Rebuild a session from a snapshot after validating it.
    pub fn restore(snapshot: GameSnapshot) -> Result<Game, SnapshotError> {
        let GameSnapshot {
            board,
            players,
            current_player,
        } = snapshot;
        for (color, player) in Color::ALL.into_iter().zip(&players) {
            if player.color() != color {
                return Err(SnapshotError::PlayerColor {
                    name: player.name().to_string(),
                    expected: color,
                });
            }
        }
        board.validate()?;
        Ok(Game::from_board(board, players, current_player))
    }

    /// Capture the session as a plain serializable value.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            players: self.players.clone(),
            current_player: self.current,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    pub fn opponent(&self) -> &Player {
        self.player(self.current.flip())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::Terminal(outcome) => Some(outcome),
            GameState::AwaitingMove => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Whether the side to move is in check. Informational only.
    pub fn in_check(&self) -> bool {
        self.board.in_check(self.current)
    }

    /// Return `true` if any piece of `color` has a safe move.
    pub fn has_safe_move(&self, color: Color) -> bool {
        self.board
            .pieces_of(color)
            .any(|piece| !piece.safe_moves(&self.board).is_empty())
    }

    /// `color` is in check and has no safe move.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.board.in_check(color) && !self.has_safe_move(color)
    }

    /// `color` is not in check and has no safe move.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.board.in_check(color) && !self.has_safe_move(color)
    }

    /// Check that `square` holds a piece of the side to move that can do something.
    ///
    /// # Errors
    ///
    /// [`RulesError::EmptySquare`], [`RulesError::NotYourPiece`] or
    /// [`RulesError::NoLegalMoves`]; also [`RulesError::GameOver`].
    pub fn select(&self, square: Square) -> Result<&Piece, RulesError> {
        if self.is_over() {
            return Err(RulesError::GameOver);
        }
        let piece = self
            .board
            .occupant(square)?
            .ok_or(RulesError::EmptySquare { square })?;
        if piece.color() != self.current {
            return Err(RulesError::NotYourPiece {
                square,
                color: piece.color(),
                to_move: self.current,
            });
        }
        let has_special = !self.castle_options(square).is_empty()
            || !self.en_passant_options(square).is_empty();
        if piece.safe_moves(&self.board).is_empty() && !has_special {
            return Err(RulesError::NoLegalMoves { square });
        }
        Ok(piece)
    }

    /// Safe destinations of the selected piece.
    pub fn legal_targets(&self, square: Square) -> Result<Vec<Square>, RulesError> {
        Ok(self.select(square)?.safe_moves(&self.board))
    }

    /// Castle sides available to the king on `square`.
    pub fn castle_options(&self, square: Square) -> Vec<CastleSide> {
        CastleSide::ALL
            .into_iter()
            .filter(|&side| self.board.castle_available(square, side))
            .collect()
    }

    /// En passant sides available to the pawn on `square` that keep its king safe.
    pub fn en_passant_options(&self, square: Square) -> Vec<EnPassantSide> {
        EnPassantSide::ALL
            .into_iter()
            .filter(|&side| {
                self.board.en_passant_available(square, side)
                    && !self.board.en_passant_exposes_king(square, side)
            })
            .collect()
    }

    /// Validate and execute one request, then hand the turn to the other side.
    ///
    /// A pawn reaching its last row is promoted before the turn ends, asking
    /// `chooser` until it names an allowed kind. A rejected request leaves the
    /// game unchanged.
    pub fn play(
        &mut self,
        request: MoveRequest,
        chooser: &mut impl PromotionChooser,
    ) -> Result<TurnReport, RulesError> {
        let mover = self.current;
        self.select(request.origin())?;

        let mut captured = None;
        let mut promotion_square = None;
        match request {
            MoveRequest::Move { from, to } => {
                let outcome = self.board.execute_move(from, to)?;
                captured = outcome.captured;
                promotion_square = outcome.promotion;
            }
            MoveRequest::Castle { king, side } => {
                if !self.board.castle_available(king, side) {
                    return Err(RulesError::CastleUnavailable { king, side });
                }
                self.board.execute_castle(king, side)?;
            }
            MoveRequest::EnPassant { pawn, side } => {
                if !self.board.en_passant_available(pawn, side) {
                    return Err(RulesError::EnPassantUnavailable { pawn, side });
                }
                if self.board.en_passant_exposes_king(pawn, side) {
                    let piece = self.select(pawn)?;
                    return Err(RulesError::IllegalMove {
                        from: pawn,
                        to: en_passant_landing(piece, side),
                        valid: piece.safe_moves(&self.board),
                    });
                }
                self.board.execute_en_passant(pawn, side)?;
                captured = Some(PieceKind::Pawn);
            }
        }

        let promoted = match promotion_square {
            Some(square) => Some(self.resolve_promotion(square, chooser)?),
            None => None,
        };

        self.advance_turn();
        Ok(TurnReport {
            mover,
            captured,
            promoted,
            check: self.in_check(),
            state: self.state,
        })
    }

    /// The side to move resigns.
    pub fn forfeit(&mut self) -> Result<Outcome, RulesError> {
        if self.is_over() {
            return Err(RulesError::GameOver);
        }
        let outcome = Outcome::Forfeit {
            winner: self.current.flip(),
        };
        info!(loser = %self.current, "player forfeited");
        self.state = GameState::Terminal(outcome);
        Ok(outcome)
    }

    fn resolve_promotion(
        &mut self,
        square: Square,
        chooser: &mut impl PromotionChooser,
    ) -> Result<PieceKind, RulesError> {
        loop {
            let kind = chooser.choose(square, self.current);
            match self.board.promote(square, kind) {
                Ok(()) => return Ok(kind),
                Err(err @ RulesError::InvalidPromotionChoice { .. }) => {
                    warn!(%square, %kind, "rejected promotion choice");
                    chooser.rejected(&err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Swap sides, close the new mover's en passant windows and re-evaluate.
    fn advance_turn(&mut self) {
        self.current = self.current.flip();
        self.board.clear_en_passant(self.current);
        self.state = self.evaluate();
        if let GameState::Terminal(outcome) = self.state {
            info!(?outcome, "game over");
        }
    }

    fn evaluate(&self) -> GameState {
        if self.has_safe_move(self.current) {
            GameState::AwaitingMove
        } else if self.board.in_check(self.current) {
            GameState::Terminal(Outcome::Checkmate {
                winner: self.current.flip(),
            })
        } else {
            GameState::Terminal(Outcome::Stalemate)
        }
    }
}
