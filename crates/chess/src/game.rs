//! Game state machine: a position, its history and a status that only ever
//! moves from `InProgress` to one terminal value.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::position::RepetitionKey;
use crate::{ChessError, Color, Move, Position, Result, Status};

/// Half-moves without a capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position that draw the game.
pub const REPETITION_LIMIT: usize = 3;

/// A game of chess under the standard rules.
///
/// Threefold repetition is declared automatically when a position occurs for
/// the third time; no claim is needed.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    /// Every position of the game, starting with the initial one and ending
    /// with the current one
    history: Vec<Position>,
    moves: Vec<Move>,
    repetitions: HashMap<RepetitionKey, usize>,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard initial position.
    pub fn new() -> Self {
        Self::start(Position::starting())
    }

    /// A game from an externally built position.
    ///
    /// Fails with [`ChessError::MalformedPosition`] when the position breaks
    /// the invariants checked by [`Position::validate`]. A position that is
    /// already mate, stalemate or dead starts the game terminal.
    pub fn from_position(position: Position) -> Result<Self> {
        position.validate()?;
        Ok(Self::start(position))
    }

    fn start(position: Position) -> Self {
        let mut game = Game {
            position: position.clone(),
            history: vec![position.clone()],
            moves: Vec::new(),
            repetitions: HashMap::from([(position.repetition_key(), 1)]),
            status: Status::InProgress,
        };
        game.status = game.evaluate();
        game
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn history(&self) -> &[Position] {
        &self.history
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Legal moves in the current position; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.position.legal_moves()
    }

    /// How often `position` has occurred in this game, counters ignored.
    pub fn repetition_count(&self, position: &Position) -> usize {
        self.repetitions
            .get(&position.repetition_key())
            .copied()
            .unwrap_or(0)
    }

    /// Resolves coordinate text against the current legal moves.
    pub fn parse_move(&self, text: &str) -> Result<Move> {
        self.position.parse_move(text)
    }

    /// Plays a move and returns the new status.
    ///
    /// A pawn move onto the last rank without a promotion kind promotes to a
    /// queen. On error the game is left exactly as it was.
    pub fn apply_move(&mut self, mv: Move) -> Result<Status> {
        if self.is_over() {
            return Err(ChessError::GameOver(self.status));
        }

        let mv = self.position.normalize_promotion(mv);
        if self.position.legal_moves().binary_search(&mv).is_err() {
            return Err(ChessError::IllegalMove(mv));
        }
        let next = self.position.make_move(mv)?;

        *self.repetitions.entry(next.repetition_key()).or_insert(0) += 1;
        self.history.push(next.clone());
        self.moves.push(mv);
        self.position = next;
        self.status = self.evaluate();

        debug!(%mv, status = %self.status, ply = self.moves.len(), "move applied");
        if self.is_over() {
            info!(status = %self.status, plies = self.moves.len(), "game over");
        }
        Ok(self.status)
    }

    /// Concedes the game for `color`.
    pub fn resign(&mut self, color: Color) -> Result<Status> {
        if self.is_over() {
            return Err(ChessError::GameOver(self.status));
        }
        self.conclude(Status::resigned(color));
        Ok(self.status)
    }

    /// Forces a terminal status decided outside the board, such as a flag fall.
    pub(crate) fn conclude(&mut self, status: Status) {
        if self.status != status {
            info!(%status, plies = self.moves.len(), "game over");
        }
        self.status = status;
    }

    fn evaluate(&self) -> Status {
        let pos = &self.position;
        if !pos.has_legal_move() {
            return if pos.is_check() {
                Status::checkmated(pos.side_to_move())
            } else {
                Status::DrawStalemate
            };
        }
        if pos.has_insufficient_material() {
            return Status::DrawInsufficientMaterial;
        }
        if self.repetition_count(pos) >= REPETITION_LIMIT {
            return Status::DrawThreefold;
        }
        if pos.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
            return Status::DrawFiftyMove;
        }
        Status::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    fn play(game: &mut Game, moves: &[&str]) -> Status {
        let mut status = game.status();
        for text in moves {
            let mv = game.parse_move(text).unwrap();
            status = game.apply_move(mv).unwrap();
        }
        status
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.status(), Status::InProgress);
        assert_eq!(game.history().len(), 1);
        assert!(game.moves().is_empty());
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.repetition_count(&Position::starting()), 1);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        let status = play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(status, Status::WhiteCheckmated);
        assert_eq!(status.winner(), Some(Color::Black));
        assert_eq!(game.history().len(), 5);
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = Game::new();
        let before = game.position().clone();
        let mv = Move::normal(Square::E2, Square::E5);
        assert_eq!(game.apply_move(mv), Err(ChessError::IllegalMove(mv)));
        assert_eq!(game.position(), &before);
        assert_eq!(game.history().len(), 1);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_bare_promotion_is_queen() {
        let pos = Position::from_fen("8/4P2k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut game = Game::from_position(pos).unwrap();
        game.apply_move(Move::normal(Square::E7, Square::E8)).unwrap();
        assert_eq!(
            game.position().piece_at(Square::E8),
            Some(crate::Piece::WHITE_QUEEN)
        );
        assert_eq!(game.moves()[0].to_string(), "e7e8q");
    }

    #[test]
    fn test_from_position_rejects_malformed() {
        let kingless = Position::from_fen("8/8/8/8/8/8/4P3/8 w - - 0 1").unwrap();
        assert!(matches!(
            Game::from_position(kingless),
            Err(ChessError::MalformedPosition(_))
        ));
    }

    #[test]
    fn test_terminal_on_construction() {
        let mated =
            Position::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
                .unwrap();
        let game = Game::from_position(mated).unwrap();
        assert_eq!(game.status(), Status::BlackCheckmated);
    }

    #[test]
    fn test_resign() {
        let mut game = Game::new();
        assert_eq!(game.resign(Color::White), Ok(Status::WhiteResigned));
        assert_eq!(
            game.resign(Color::Black),
            Err(ChessError::GameOver(Status::WhiteResigned))
        );
        assert_eq!(
            game.apply_move(Move::normal(Square::E2, Square::E4)),
            Err(ChessError::GameOver(Status::WhiteResigned))
        );
    }
}
