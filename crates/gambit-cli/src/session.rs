//! Interactive turn loop: draws the board, reads coordinates, announces the result.
//!
//! Generic over [`BufRead`] and [`Write`] so the loop runs unchanged on a
//! terminal and on scripted input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use gambit_core::{
    CastleSide, Color, EnPassantSide, Game, MoveRequest, Outcome, PieceKind, PromotionChooser,
    RulesError, Square, TurnReport,
};

use crate::error::CliError;
use crate::notation::parse_square;
use crate::save::SaveStore;

/// Settings for a session, filled from the command line.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding save files.
    pub save_dir: PathBuf,
    /// Display name of the White player.
    pub white: String,
    /// Display name of the Black player.
    pub black: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            white: "White".to_string(),
            black: "Black".to_string(),
        }
    }
}

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The game reached a result.
    Finished(Outcome),
    /// The game was saved to the given file.
    Saved(PathBuf),
    /// Input ran out before the game ended.
    InputClosed,
}

/// What the player typed at the selection prompt.
enum Selection {
    Piece(Square),
    Save,
    Forfeit,
}

/// One interactive game bound to an input and an output stream.
pub struct Session<R, W> {
    game: Game,
    saves: SaveStore,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Start a new game from the standard position.
    pub fn new(config: &SessionConfig, input: R, output: W) -> Self {
        info!(white = %config.white, black = %config.black, "starting new game");
        let game = Game::new(config.white.clone(), config.black.clone());
        Self::with_game(game, SaveStore::new(&config.save_dir), input, output)
    }

    /// Resume the game saved under `name` in the configured save directory.
    ///
    /// # Errors
    ///
    /// Fails if the save is missing, is not a snapshot, or holds an invalid board.
    pub fn resume(
        config: &SessionConfig,
        name: &str,
        input: R,
        output: W,
    ) -> Result<Self, CliError> {
        let saves = SaveStore::new(&config.save_dir);
        let game = Game::restore(saves.load(name)?)?;
        info!(save = name, to_move = %game.current_player().color(), "resuming game");
        Ok(Self::with_game(game, saves, input, output))
    }

    /// Wrap an existing game.
    pub fn with_game(game: Game, saves: SaveStore, input: R, output: W) -> Self {
        Self {
            game,
            saves,
            input,
            output,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Consume the session, returning its output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Play until the game ends, the player saves, or input runs out.
    pub fn run(&mut self) -> Result<SessionEnd, CliError> {
        loop {
            writeln!(self.output, "{}", self.game.board().pretty())?;
            if let Some(outcome) = self.game.outcome() {
                self.announce(outcome)?;
                return Ok(SessionEnd::Finished(outcome));
            }

            writeln!(self.output, "{}'s turn!", self.game.current_player().name())?;
            if self.game.in_check() {
                writeln!(self.output, "You are currently in check!")?;
            }

            let Some(selection) = self.read_selection()? else {
                return Ok(SessionEnd::InputClosed);
            };
            match selection {
                Selection::Save => {
                    return Ok(match self.save_prompt()? {
                        Some(path) => SessionEnd::Saved(path),
                        None => SessionEnd::InputClosed,
                    });
                }
                Selection::Forfeit => {
                    let outcome = self.game.forfeit()?;
                    self.announce(outcome)?;
                    return Ok(SessionEnd::Finished(outcome));
                }
                Selection::Piece(square) => {
                    let Some(report) = self.read_move(square)? else {
                        return Ok(SessionEnd::InputClosed);
                    };
                    debug!(?report, "turn complete");
                }
            }
        }
    }

    /// Ask for a piece until the player names a movable one, `S` or `F`.
    fn read_selection(&mut self) -> Result<Option<Selection>, CliError> {
        loop {
            writeln!(self.output, "Select a piece to move OR [S - save] [F - Forfeit]")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.to_ascii_uppercase().as_str() {
                "S" => return Ok(Some(Selection::Save)),
                "F" => return Ok(Some(Selection::Forfeit)),
                _ => {}
            }
            let selected = parse_square(&line).map_err(CliError::from).and_then(|square| {
                self.game
                    .select(square)
                    .map(|piece| piece.location())
                    .map_err(CliError::from)
            });
            match selected {
                Ok(square) => return Ok(Some(Selection::Piece(square))),
                Err(err) => self.reject(err)?,
            }
        }
    }

    /// Ask where the piece on `from` goes and play it, re-asking on rejected input.
    fn read_move(&mut self, from: Square) -> Result<Option<TurnReport>, CliError> {
        let castles = self.game.castle_options(from);
        let en_passants = self.game.en_passant_options(from);
        loop {
            writeln!(self.output, "Select the location to move to: ")?;
            if !castles.is_empty() {
                writeln!(self.output, "Castling is currently valid:")?;
                for side in &castles {
                    match side {
                        CastleSide::Short => writeln!(self.output, "[S - Short Castling]")?,
                        CastleSide::Long => writeln!(self.output, "[L - Long Castling]")?,
                    }
                }
            } else if !en_passants.is_empty() {
                writeln!(self.output, "En passant is currently valid:")?;
                for side in &en_passants {
                    match side {
                        EnPassantSide::Left => {
                            writeln!(self.output, "[L - Leftward En Passant]")?
                        }
                        EnPassantSide::Right => {
                            writeln!(self.output, "[R - Rightward En Passant]")?
                        }
                    }
                }
            }

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let request = match special_move(&line, from, &castles, &en_passants) {
                Some(request) => request,
                None => match parse_square(&line) {
                    Ok(to) => MoveRequest::Move { from, to },
                    Err(err) => {
                        self.reject(err.into())?;
                        continue;
                    }
                },
            };

            let mut chooser = PromptChooser::new(&mut self.input, &mut self.output);
            let played = self.game.play(request, &mut chooser);
            if let Some(err) = chooser.failure.take() {
                return Err(err.into());
            }
            match played {
                Ok(report) => return Ok(Some(report)),
                Err(err) => self.reject(err.into())?,
            }
        }
    }

    /// Ask for a save name, write the snapshot, and report where it went.
    fn save_prompt(&mut self) -> Result<Option<PathBuf>, CliError> {
        loop {
            write!(self.output, "Please enter a name for your saved file: ")?;
            self.output.flush()?;
            let Some(name) = self.read_line()? else {
                return Ok(None);
            };
            match self.saves.save(&name, &self.game.snapshot()) {
                Ok(path) => {
                    writeln!(self.output, "Save File {} created!", path.display())?;
                    return Ok(Some(path));
                }
                Err(err) => self.reject(err)?,
            }
        }
    }

    fn announce(&mut self, outcome: Outcome) -> Result<(), CliError> {
        match outcome {
            Outcome::Checkmate { winner } => {
                let winner_name = self.game.player(winner).name();
                let loser_name = self.game.player(winner.flip()).name();
                writeln!(
                    self.output,
                    "{winner_name} has checkmated {loser_name}! {winner_name} wins!"
                )?;
            }
            Outcome::Stalemate => {
                writeln!(self.output, "The game is a stalemate! It's a draw!")?;
            }
            Outcome::Forfeit { winner } => {
                writeln!(
                    self.output,
                    "{} has forfeited! {} wins!",
                    self.game.player(winner.flip()).name(),
                    self.game.player(winner).name()
                )?;
            }
        }
        Ok(())
    }

    /// Show a recoverable error so the player can try again; propagate the rest.
    fn reject(&mut self, err: CliError) -> Result<(), CliError> {
        if !err.is_recoverable() {
            return Err(err);
        }
        warn!(error = %err, "rejected input");
        writeln!(self.output, "{err}")?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, CliError> {
        Ok(read_trimmed(&mut self.input)?)
    }
}

/// Map `S`/`L` (castling) or `L`/`R` (en passant) to a request when offered.
fn special_move(
    line: &str,
    from: Square,
    castles: &[CastleSide],
    en_passants: &[EnPassantSide],
) -> Option<MoveRequest> {
    let choice = line.to_ascii_uppercase();
    if !castles.is_empty() {
        let side = match choice.as_str() {
            "S" => CastleSide::Short,
            "L" => CastleSide::Long,
            _ => return None,
        };
        return castles
            .contains(&side)
            .then_some(MoveRequest::Castle { king: from, side });
    }
    let side = match choice.as_str() {
        "L" => EnPassantSide::Left,
        "R" => EnPassantSide::Right,
        _ => return None,
    };
    en_passants
        .contains(&side)
        .then_some(MoveRequest::EnPassant { pawn: from, side })
}

/// Read one line without its terminator, or `None` at end of input.
fn read_trimmed(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Promotion prompt reading `1`-`4` or a piece letter from the session's input.
struct PromptChooser<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    /// First I/O failure; the session reports it once the turn is over.
    failure: Option<io::Error>,
}

impl<'a, R: BufRead, W: Write> PromptChooser<'a, R, W> {
    fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            input,
            output,
            failure: None,
        }
    }

    fn ask(&mut self) -> io::Result<Option<PieceKind>> {
        loop {
            writeln!(
                self.output,
                "Promote pawn to which unit: [1 - Queen] [2 - Rook] [3 - Knight] [4 - Bishop]"
            )?;
            let Some(line) = read_trimmed(&mut *self.input)? else {
                return Ok(None);
            };
            if let Some(kind) = parse_promotion(&line) {
                return Ok(Some(kind));
            }
            warn!(input = %line, "unrecognised promotion choice");
        }
    }
}

impl<R: BufRead, W: Write> PromotionChooser for PromptChooser<'_, R, W> {
    fn choose(&mut self, square: Square, color: Color) -> PieceKind {
        if self.failure.is_none() {
            match self.ask() {
                Ok(Some(kind)) => return kind,
                Ok(None) => {
                    warn!(%square, %color, "input closed during promotion, choosing Queen");
                }
                Err(err) => self.failure = Some(err),
            }
        }
        PieceKind::Queen
    }

    fn rejected(&mut self, error: &RulesError) {
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.output, "{error}") {
            self.failure = Some(err);
        }
    }
}

/// `1`-`4` in menu order, or a single piece letter.
fn parse_promotion(text: &str) -> Option<PieceKind> {
    if let Ok(n) = text.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| PieceKind::PROMOTIONS.get(i).copied());
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::from_letter(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{Session, SessionConfig, SessionEnd, parse_promotion};
    use crate::save::SaveStore;
    use gambit_core::{Board, Color, Game, Outcome, Piece, PieceKind, Player, Square};

    fn script(lines: &[&str]) -> Cursor<Vec<u8>> {
        let mut text = lines.join("\n");
        text.push('\n');
        Cursor::new(text.into_bytes())
    }

    fn run_new(lines: &[&str]) -> (SessionEnd, Game, String) {
        let mut session = Session::new(&SessionConfig::default(), script(lines), Vec::new());
        let end = session.run().unwrap();
        let game = session.game().clone();
        let output = String::from_utf8(session.into_output()).unwrap();
        (end, game, output)
    }

    fn run_position(board: Board, to_move: Color, lines: &[&str]) -> (SessionEnd, Game, String) {
        let players = [
            Player::new("Ann", Color::White),
            Player::new("Bo", Color::Black),
        ];
        let game = Game::from_board(board, players, to_move);
        let mut session = Session::with_game(game, SaveStore::default(), script(lines), Vec::new());
        let end = session.run().unwrap();
        let game = session.game().clone();
        let output = String::from_utf8(session.into_output()).unwrap();
        (end, game, output)
    }

    fn put(board: &mut Board, kind: PieceKind, color: Color, row: i8, col: i8) {
        let at = Square::new(row, col);
        board.place(at, Some(Piece::new(kind, color, at))).unwrap();
    }

    #[test]
    fn fools_mate_is_announced() {
        let (end, game, output) = run_new(&["F2", "F3", "E7", "E5", "G2", "G4", "D8", "H4"]);
        assert_eq!(
            end,
            SessionEnd::Finished(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert!(game.is_over());
        assert!(output.contains("White's turn!"));
        assert!(output.contains("Black has checkmated White! Black wins!"));
        assert!(!output.contains("You are currently in check!"));
    }

    #[test]
    fn bad_input_is_reported_and_asked_again() {
        let (end, game, output) = run_new(&["", "Z9", "E5", "E7", "A1", "E2", "E5", "E4"]);
        assert_eq!(end, SessionEnd::InputClosed);
        assert_eq!(game.current_player().color(), Color::Black);
        assert!(output.contains("entered empty string, please try again"));
        assert!(output.contains("incorrect input format \"Z9\""));
        assert!(output.contains("location E5 is empty"));
        assert!(output.contains("piece at E7 is black but it is white's turn"));
        assert!(output.contains("piece at A1 has no valid moves"));
        assert!(output.contains("E5 is not a valid destination from E2; valid moves: E3, E4"));
        assert!(output.contains("Black's turn!"));
    }

    #[test]
    fn forfeit_names_the_winner() {
        let (end, _, output) = run_new(&["E2", "E4", "f"]);
        assert_eq!(
            end,
            SessionEnd::Finished(Outcome::Forfeit {
                winner: Color::White
            })
        );
        assert!(output.contains("Black has forfeited! White wins!"));
    }

    #[test]
    fn save_writes_a_snapshot_and_stops() {
        let dir = std::env::temp_dir().join(format!("gambit-session-save-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let config = SessionConfig {
            save_dir: dir.clone(),
            ..SessionConfig::default()
        };

        let mut session = Session::new(
            &config,
            script(&["E2", "E4", "s", "../x", "midgame"]),
            Vec::new(),
        );
        let end = session.run().unwrap();
        let expected = dir.join("midgame.json");
        assert_eq!(end, SessionEnd::Saved(expected.clone()));
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains("invalid save name \"../x\""));
        assert!(output.contains("created!"));

        let mut resumed =
            Session::resume(&config, "midgame", script(&["D7", "D5"]), Vec::new()).unwrap();
        assert_eq!(resumed.game().current_player().name(), "Black");
        assert_eq!(resumed.run().unwrap(), SessionEnd::InputClosed);
        assert_eq!(resumed.game().current_player().color(), Color::White);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resume_of_a_missing_save_fails() {
        let config = SessionConfig {
            save_dir: std::env::temp_dir().join("gambit-session-nothing"),
            ..SessionConfig::default()
        };
        assert!(Session::resume(&config, "absent", script(&[]), Vec::new()).is_err());
    }

    #[test]
    fn castle_menu() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 4);
        put(&mut board, PieceKind::Rook, Color::White, 7, 7);
        put(&mut board, PieceKind::Rook, Color::White, 7, 0);
        put(&mut board, PieceKind::King, Color::Black, 0, 4);

        let (_, game, output) = run_position(board, Color::White, &["E1", "L"]);
        assert!(output.contains("Castling is currently valid:"));
        assert!(output.contains("[S - Short Castling]"));
        assert!(output.contains("[L - Long Castling]"));
        let king = game.board().occupant(Square::new(7, 2)).unwrap().unwrap();
        assert_eq!(king.kind(), PieceKind::King);
        let rook = game.board().occupant(Square::new(7, 3)).unwrap().unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
    }

    #[test]
    fn castle_menu_still_takes_a_destination() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 4);
        put(&mut board, PieceKind::Rook, Color::White, 7, 7);
        put(&mut board, PieceKind::King, Color::Black, 0, 4);

        let (_, game, output) = run_position(board, Color::White, &["E1", "L", "D2"]);
        assert!(!output.contains("[L - Long Castling]"));
        assert!(output.contains("incorrect input format \"L\""));
        let king = game.board().occupant(Square::new(6, 3)).unwrap().unwrap();
        assert_eq!(king.kind(), PieceKind::King);
    }

    #[test]
    fn en_passant_menu() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 4);
        put(&mut board, PieceKind::King, Color::Black, 0, 4);
        put(&mut board, PieceKind::Pawn, Color::White, 3, 4);
        put(&mut board, PieceKind::Pawn, Color::Black, 1, 5);

        let (_, game, output) = run_position(board, Color::Black, &["F7", "F5", "E5", "R"]);
        assert!(output.contains("En passant is currently valid:"));
        assert!(output.contains("[R - Rightward En Passant]"));
        assert!(!output.contains("[L - Leftward En Passant]"));
        let board = game.board();
        assert!(board.occupant(Square::new(3, 5)).unwrap().is_none());
        let pawn = board.occupant(Square::new(2, 5)).unwrap().unwrap();
        assert_eq!(pawn.color(), Color::White);
    }

    #[test]
    fn promotion_prompt_asks_until_valid() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, 7, 7);
        put(&mut board, PieceKind::King, Color::Black, 0, 7);
        put(&mut board, PieceKind::Pawn, Color::White, 1, 0);

        let (_, game, output) = run_position(board, Color::White, &["A7", "A8", "9", "k", "2"]);
        let prompt = "Promote pawn to which unit: [1 - Queen] [2 - Rook] [3 - Knight] [4 - Bishop]";
        assert_eq!(output.matches(prompt).count(), 3);
        assert!(output.contains("cannot promote to King"));
        let rook = game.board().occupant(Square::new(0, 0)).unwrap().unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert_eq!(game.current_player().color(), Color::Black);
    }

    #[test]
    fn stalemate_is_announced() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::Black, 0, 0);
        put(&mut board, PieceKind::King, Color::White, 2, 1);
        put(&mut board, PieceKind::Queen, Color::White, 3, 2);

        let (end, _, output) = run_position(board, Color::White, &["C5", "C7"]);
        assert_eq!(end, SessionEnd::Finished(Outcome::Stalemate));
        assert!(output.contains("The game is a stalemate! It's a draw!"));
    }

    #[test]
    fn promotion_answers() {
        assert_eq!(parse_promotion("1"), Some(PieceKind::Queen));
        assert_eq!(parse_promotion("4"), Some(PieceKind::Bishop));
        assert_eq!(parse_promotion("n"), Some(PieceKind::Knight));
        assert_eq!(parse_promotion("P"), Some(PieceKind::Pawn));
        assert_eq!(parse_promotion("0"), None);
        assert_eq!(parse_promotion("5"), None);
        assert_eq!(parse_promotion("queen"), None);
    }
}
