//! Forsyth-Edwards Notation.
//!
//! Parsing is structural only: a FEN may describe a board that is not a legal
//! game position (no kings, pawns on the back rank). [`Position::validate`]
//! decides whether a parsed board can start a game.

use std::str::FromStr;

use crate::position::CastlingRights;
use crate::{ChessError, Color, Piece, Position, Result, Square};

/// FEN of the standard initial position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parses a FEN string. The halfmove clock and fullmove number are optional
    /// and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let invalid = |msg: String| ChessError::InvalidFen(format!("{msg} in {fen:?}"));

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(invalid(format!("expected 4 to 6 fields, got {}", parts.len())));
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid(format!("expected 8 ranks, got {}", ranks.len())));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                } else {
                    let piece =
                        Piece::from_char(c).ok_or_else(|| invalid(format!("bad piece {c:?}")))?;
                    let sq = Square::from_coords(file, rank)
                        .ok_or_else(|| invalid(format!("rank {} overflows", rank + 1)))?;
                    pos.put(sq, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(invalid(format!("rank {} overflows", rank + 1)));
                }
            }
            if file != 8 {
                return Err(invalid(format!("rank {} has {file} files", rank + 1)));
            }
        }

        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad side to move {other:?}"))),
        };
        pos.set_side_to_move(side);

        let rights = CastlingRights::from_fen(parts[2])
            .ok_or_else(|| invalid(format!("bad castling field {:?}", parts[2])))?;
        pos.set_castling_rights(rights);

        let ep = match parts[3] {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .ok_or_else(|| invalid(format!("bad en passant square {text:?}")))?,
            ),
        };
        pos.set_en_passant_square(ep);

        if let Some(text) = parts.get(4) {
            let clock = text
                .parse()
                .map_err(|_| invalid(format!("bad halfmove clock {text:?}")))?;
            pos.set_halfmove_clock(clock);
        }
        if let Some(text) = parts.get(5) {
            let number = text
                .parse()
                .map_err(|_| invalid(format!("bad fullmove number {text:?}")))?;
            pos.set_fullmove_number(number);
        }

        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0u8;
            for file in 0..8u8 {
                match self.piece_at(Square::new_unchecked(rank * 8 + file)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });
        fen.push(' ');
        fen.push_str(&self.castling_rights().to_fen());
        fen.push(' ');
        match self.en_passant_square() {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }
        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));

        fen
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen(s)
    }
}
