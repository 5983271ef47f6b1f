//! Moves as (source, destination, promotion) triples packed into 16 bits.
//!
//! Layout: `from(6) | to(6) | promotion(3)`, most significant first, so the
//! derived ordering sorts by source square, then destination, then promotion.
//! Special moves (castling, en passant, double pushes) are not flagged; the
//! position a move is applied to decides what it means.

use std::fmt;
use std::str::FromStr;

use crate::{ChessError, PieceKind, Square};

/// A move from one square to another, with an optional promotion kind.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move(u16);

impl Move {
    /// Creates a move; equality is structural over all three fields.
    #[inline]
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        let promo = match promotion {
            Some(kind) => kind as u16 + 1,
            None => 0,
        };
        Move(((from.0 as u16) << 9) | ((to.0 as u16) << 3) | promo)
    }

    /// A move without promotion.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, None)
    }

    #[inline]
    pub const fn promotion_to(from: Square, to: Square, kind: PieceKind) -> Self {
        Self::new(from, to, Some(kind))
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square(((self.0 >> 9) & 0x3F) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square(((self.0 >> 3) & 0x3F) as u8)
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self.0 & 0x7 {
            0 => None,
            code => PieceKind::from_index(code as usize - 1),
        }
    }

    /// Same source and destination, with the promotion replaced.
    #[inline]
    pub const fn with_promotion(self, promotion: Option<PieceKind>) -> Self {
        Self::new(self.from(), self.to(), promotion)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

/// Parses coordinate notation: `e2e4`, `e7e8q`.
///
/// This is purely syntactic. Use [`crate::Position::parse_move`] to resolve
/// the text against the legal moves of a position.
impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ChessError::InvalidNotation(format!("bad coordinate move {s:?}"));
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(bad)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(bad)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(kind) if kind.is_promotable() => Some(kind),
                _ => return Err(bad()),
            },
        };
        Ok(Move::new(from, to, promotion))
    }
}
