//! Resolving coordinate move text against a position.

use crate::{ChessError, Move, PieceKind, Position, Result};

impl Position {
    /// Parses coordinate notation and checks it against the legal moves.
    ///
    /// A pawn move onto the last rank without a promotion letter resolves to
    /// the queen promotion, so `e7e8` and `e7e8q` are the same move.
    pub fn parse_move(&self, text: &str) -> Result<Move> {
        let mv: Move = text.trim().parse()?;
        let mv = self.normalize_promotion(mv);
        if self.legal_moves().binary_search(&mv).is_ok() {
            Ok(mv)
        } else {
            Err(ChessError::IllegalMove(mv))
        }
    }

    /// Adds the default queen promotion to a bare pawn move onto the last rank.
    pub(crate) fn normalize_promotion(&self, mv: Move) -> Move {
        let us = self.side_to_move();
        let promotes = mv.promotion().is_none()
            && mv.to().rank() == us.promotion_rank()
            && self
                .piece_at(mv.from())
                .is_some_and(|p| p.color == us && p.kind == PieceKind::Pawn);
        if promotes {
            mv.with_promotion(Some(PieceKind::Queen))
        } else {
            mv
        }
    }
}
