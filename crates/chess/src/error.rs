use thiserror::Error;

use crate::{Move, Status};

/// Errors returned by the rules engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("game is over: {0}")]
    GameOver(Status),

    #[error("malformed position: {0}")]
    MalformedPosition(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid notation: {0}")]
    InvalidNotation(String),
}

/// Convenience Result type for rules operations
pub type Result<T> = std::result::Result<T, ChessError>;
