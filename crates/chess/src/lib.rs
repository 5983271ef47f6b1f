//! Arbiter Chess - chess rules with a bitboard representation
//!
//! This crate enforces the rules of chess: it holds positions, generates legal
//! moves, applies them, decides when a game is over and keeps per-side clocks.
//! It does not search or evaluate.

mod attacks;
mod bitboard;
mod clock;
mod error;
mod fen;
mod game;
mod movegen;
mod moves;
mod notation;
mod perft;
mod piece;
mod position;
mod square;
mod status;

pub use attacks::{attacks, AttackTables};
pub use bitboard::{Bitboard, BitboardIter};
pub use clock::{Clock, TimeControl, TimedGame};
pub use error::{ChessError, Result};
pub use fen::STARTING_FEN;
pub use game::{Game, FIFTY_MOVE_HALFMOVES, REPETITION_LIMIT};
pub use movegen::PromotionPolicy;
pub use moves::Move;
pub use perft::{divide, perft};
pub use piece::{Color, Piece, PieceKind};
pub use position::{CastleSide, CastlingRights, Position, RepetitionKey};
pub use square::Square;
pub use status::Status;
