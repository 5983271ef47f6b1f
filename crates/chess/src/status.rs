use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Color;

/// Where a game stands. Every variant except `InProgress` is terminal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    InProgress,
    WhiteCheckmated,
    BlackCheckmated,
    WhiteResigned,
    BlackResigned,
    DrawStalemate,
    DrawThreefold,
    DrawFiftyMove,
    DrawInsufficientMaterial,
    WhiteForfeitOnTime,
    BlackForfeitOnTime,
}

impl Status {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::InProgress)
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            Status::DrawStalemate
                | Status::DrawThreefold
                | Status::DrawFiftyMove
                | Status::DrawInsufficientMaterial
        )
    }

    /// The winning side of a decisive result.
    pub const fn winner(self) -> Option<Color> {
        match self {
            Status::WhiteCheckmated | Status::WhiteResigned | Status::WhiteForfeitOnTime => {
                Some(Color::Black)
            }
            Status::BlackCheckmated | Status::BlackResigned | Status::BlackForfeitOnTime => {
                Some(Color::White)
            }
            _ => None,
        }
    }

    pub(crate) const fn checkmated(loser: Color) -> Self {
        match loser {
            Color::White => Status::WhiteCheckmated,
            Color::Black => Status::BlackCheckmated,
        }
    }

    pub(crate) const fn resigned(loser: Color) -> Self {
        match loser {
            Color::White => Status::WhiteResigned,
            Color::Black => Status::BlackResigned,
        }
    }

    pub(crate) const fn forfeit_on_time(loser: Color) -> Self {
        match loser {
            Color::White => Status::WhiteForfeitOnTime,
            Color::Black => Status::BlackForfeitOnTime,
        }
    }

    /// PGN-style result string: `1-0`, `0-1`, `1/2-1/2` or `*`.
    pub const fn result_str(self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None if self.is_draw() => "1/2-1/2",
            None => "*",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::InProgress => "in progress",
            Status::WhiteCheckmated => "white is checkmated",
            Status::BlackCheckmated => "black is checkmated",
            Status::WhiteResigned => "white resigned",
            Status::BlackResigned => "black resigned",
            Status::DrawStalemate => "draw by stalemate",
            Status::DrawThreefold => "draw by threefold repetition",
            Status::DrawFiftyMove => "draw by the fifty-move rule",
            Status::DrawInsufficientMaterial => "draw by insufficient material",
            Status::WhiteForfeitOnTime => "white forfeits on time",
            Status::BlackForfeitOnTime => "black forfeits on time",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_and_draw() {
        assert!(!Status::InProgress.is_terminal());
        assert!(Status::DrawFiftyMove.is_terminal());
        assert!(Status::DrawFiftyMove.is_draw());
        assert!(!Status::WhiteResigned.is_draw());
        assert!(!Status::InProgress.is_draw());
    }

    #[test]
    fn test_winner() {
        assert_eq!(Status::WhiteCheckmated.winner(), Some(Color::Black));
        assert_eq!(Status::BlackForfeitOnTime.winner(), Some(Color::White));
        assert_eq!(Status::DrawStalemate.winner(), None);
        assert_eq!(Status::InProgress.winner(), None);
    }

    #[test]
    fn test_result_str() {
        assert_eq!(Status::BlackResigned.result_str(), "1-0");
        assert_eq!(Status::WhiteForfeitOnTime.result_str(), "0-1");
        assert_eq!(Status::DrawThreefold.result_str(), "1/2-1/2");
        assert_eq!(Status::InProgress.result_str(), "*");
    }
}
