//! Board state: piece placement, side to move, castling rights, en passant and clocks.

use crate::{attacks, Bitboard, ChessError, Color, Move, Piece, PieceKind, Result, Square};

/// Which wing a castling move goes to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    /// Files of (rook origin, rook destination, king destination).
    pub(crate) const fn files(self) -> (u8, u8, u8) {
        match self {
            CastleSide::King => (7, 5, 6),
            CastleSide::Queen => (0, 3, 2),
        }
    }
}

/// Four independent castling permissions stored as bit flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct CastlingRights(pub(crate) u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => 1,
            (Color::White, CastleSide::Queen) => 2,
            (Color::Black, CastleSide::King) => 4,
            (Color::Black, CastleSide::Queen) => 8,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        for side in CastleSide::BOTH {
            self.revoke(color, side);
        }
    }

    /// Drops every right tied to a king or rook home square.
    fn revoke_square(&mut self, sq: Square) {
        match sq {
            Square::E1 => self.revoke_all(Color::White),
            Square::A1 => self.revoke(Color::White, CastleSide::Queen),
            Square::H1 => self.revoke(Color::White, CastleSide::King),
            Square::E8 => self.revoke_all(Color::Black),
            Square::A8 => self.revoke(Color::Black, CastleSide::Queen),
            Square::H8 => self.revoke(Color::Black, CastleSide::King),
            _ => {}
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`).
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(Self::NONE);
        }
        let mut rights = Self::NONE;
        for c in s.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => return None,
            };
            rights.grant(color, side);
        }
        Some(rights)
    }

    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ]
        .iter()
        .filter(|(color, side, _)| self.has(*color, *side))
        .map(|(_, _, c)| *c)
        .collect()
    }
}

/// Identity of a position for repetition purposes: everything except the move counters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RepetitionKey {
    pieces: [[Bitboard; 6]; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}

/// A chess position.
///
/// Positions are values: [`Position::make_move`] returns a new position and
/// leaves `self` untouched, so older positions can be kept for history.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece sets indexed by [color][kind]
    pieces: [[Bitboard; 6]; 2],
    /// Occupancy per color
    occupancy: [Bitboard; 2],
    /// Square-indexed view of the same placement
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling_rights: CastlingRights,
    /// Square skipped by a pawn's two-square advance on the previous move
    en_passant: Option<Square>,
    /// Half-moves since the last capture or pawn move
    halfmove_clock: u32,
    /// Starts at 1, incremented after Black moves
    fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    /// An empty board, White to move, no rights.
    pub fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            board: [None; 64],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard initial position.
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut pos = Position::empty();
        for color in Color::BOTH {
            let back = color.back_rank();
            let pawns = color.pawn_start_rank();
            for (file, kind) in BACK_RANK.iter().enumerate() {
                let file = file as u8;
                pos.put(Square::new_unchecked(back * 8 + file), Piece::new(color, *kind));
                pos.put(
                    Square::new_unchecked(pawns * 8 + file),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        pos.castling_rights = CastlingRights::ALL;
        pos
    }

    // ----- quick setup, no legality checks -----

    /// Places a piece, replacing whatever stood on the square.
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.remove(sq);
        self.pieces[piece.color.index()][piece.kind.index()].set(sq);
        self.occupancy[piece.color.index()].set(sq);
        self.board[sq.index()] = Some(piece);
    }

    /// Empties a square, returning its former occupant.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take()?;
        self.pieces[piece.color.index()][piece.kind.index()].clear(sq);
        self.occupancy[piece.color.index()].clear(sq);
        Some(piece)
    }

    /// Removes every piece; side to move, rights and counters are kept.
    pub fn clear(&mut self) {
        self.pieces = [[Bitboard::EMPTY; 6]; 2];
        self.occupancy = [Bitboard::EMPTY; 2];
        self.board = [None; 64];
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    pub fn set_en_passant_square(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    pub fn set_fullmove_number(&mut self, number: u32) {
        self.fullmove_number = number;
    }

    // ----- read access -----

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn all_pieces(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Square of the king of `color`; `None` on a board without one.
    /// With several kings the lowest square is returned.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
        }
    }

    // ----- attacks -----

    /// Pieces of `by` that attack `sq`.
    pub fn attackers_to(&self, sq: Square, by: Color) -> Bitboard {
        let tables = attacks();
        let occ = self.all_pieces();
        let diagonal = self.pieces(by, PieceKind::Bishop) | self.pieces(by, PieceKind::Queen);
        let straight = self.pieces(by, PieceKind::Rook) | self.pieces(by, PieceKind::Queen);

        // A pawn of `by` attacks sq exactly when a pawn of the other color on sq would attack it.
        (tables.pawn_attacks(sq, by.opposite()) & self.pieces(by, PieceKind::Pawn))
            | (tables.knight_attacks(sq) & self.pieces(by, PieceKind::Knight))
            | (tables.king_attacks(sq) & self.pieces(by, PieceKind::King))
            | (tables.bishop_attacks(sq, occ) & diagonal)
            | (tables.rook_attacks(sq, occ) & straight)
    }

    /// True if any piece of `by` could pseudo-legally capture on `sq`.
    #[inline]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, by).is_not_empty()
    }

    /// True if a king of `side` is attacked. A side without a king is never in check.
    pub fn in_check(&self, side: Color) -> bool {
        self.pieces(side, PieceKind::King)
            .iter()
            .any(|king| self.is_attacked(king, side.opposite()))
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn is_check(&self) -> bool {
        self.in_check(self.side_to_move)
    }

    // ----- move application -----

    /// Applies a move and returns the resulting position.
    ///
    /// Castling, en passant and double pushes are recognised from the board:
    /// a king moving two files from its home square castles, a pawn moving
    /// diagonally onto the en-passant square captures the pawn behind it. A
    /// pawn reaching the last rank without a promotion kind becomes a queen.
    ///
    /// Fails with [`ChessError::IllegalMove`] when the source square does not
    /// hold a piece of the side to move or the destination holds one of its own.
    pub fn make_move(&self, mv: Move) -> Result<Position> {
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        let piece = match self.piece_at(from) {
            Some(piece) if piece.color == us => piece,
            _ => return Err(ChessError::IllegalMove(mv)),
        };
        if self.occupancy(us).contains(to) {
            return Err(ChessError::IllegalMove(mv));
        }

        let mut next = self.clone();
        let mut captured = next.remove(to);
        next.remove(from);

        let is_pawn = piece.kind == PieceKind::Pawn;
        if is_pawn && captured.is_none() && Some(to) == self.en_passant && from.file() != to.file() {
            captured = next.remove(Square::new_unchecked(from.rank() * 8 + to.file()));
        }

        let placed = if is_pawn && to.rank() == us.promotion_rank() {
            let kind = mv
                .promotion()
                .filter(|kind| kind.is_promotable())
                .unwrap_or(PieceKind::Queen);
            Piece::new(us, kind)
        } else {
            piece
        };
        next.put(to, placed);

        if piece.kind == PieceKind::King
            && from.file() == 4
            && from.rank() == us.back_rank()
            && to.rank() == from.rank()
            && from.file().abs_diff(to.file()) == 2
        {
            let side = if to.file() > from.file() {
                CastleSide::King
            } else {
                CastleSide::Queen
            };
            let (rook_from, rook_to, _) = side.files();
            let rank = us.back_rank();
            if let Some(rook) = next.remove(Square::new_unchecked(rank * 8 + rook_from)) {
                next.put(Square::new_unchecked(rank * 8 + rook_to), rook);
            }
        }

        next.castling_rights.revoke_square(from);
        next.castling_rights.revoke_square(to);

        next.en_passant = if is_pawn && from.rank().abs_diff(to.rank()) == 2 {
            Some(Square::new_unchecked((from.rank() + to.rank()) / 2 * 8 + from.file()))
        } else {
            None
        };

        next.halfmove_clock = if is_pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us == Color::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        next.side_to_move = us.opposite();

        Ok(next)
    }

    // ----- validation and material -----

    /// Checks the invariants of a live position: one king per side, no pawns
    /// on the first or last rank, and the side not to move not in check.
    pub fn validate(&self) -> Result<()> {
        for color in Color::BOTH {
            let kings = self.pieces(color, PieceKind::King).popcount();
            if kings != 1 {
                return Err(ChessError::MalformedPosition(format!(
                    "{color} has {kings} kings, expected 1"
                )));
            }
            let stray = self.pieces(color, PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8);
            if let Some(sq) = stray.lsb() {
                return Err(ChessError::MalformedPosition(format!(
                    "{color} pawn on {sq}"
                )));
            }
        }
        if self.in_check(self.side_to_move.opposite()) {
            return Err(ChessError::MalformedPosition(format!(
                "{} is in check but not to move",
                self.side_to_move.opposite()
            )));
        }
        Ok(())
    }

    /// Neither side can possibly deliver mate.
    ///
    /// True for K v K, K + one minor v K, and boards where the only pieces
    /// besides kings are bishops all standing on one square color.
    pub fn has_insufficient_material(&self) -> bool {
        let mut knights = Bitboard::EMPTY;
        let mut bishops = Bitboard::EMPTY;
        for color in Color::BOTH {
            if (self.pieces(color, PieceKind::Pawn)
                | self.pieces(color, PieceKind::Rook)
                | self.pieces(color, PieceKind::Queen))
            .is_not_empty()
            {
                return false;
            }
            knights |= self.pieces(color, PieceKind::Knight);
            bishops |= self.pieces(color, PieceKind::Bishop);
        }

        if knights.popcount() + bishops.popcount() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::DARK_SQUARES).is_empty()
                || (bishops & Bitboard::LIGHT_SQUARES).is_empty())
    }

    /// Whether `color` keeps enough material to ever mate: any pawn, rook or
    /// queen, or at least two minor pieces.
    ///
    /// Counts only `color`'s own pieces. A lone minor that could mate with
    /// the help of the opponent's blocking pieces (a knight against a cornered
    /// king boxed in by its own pawn) is still reported as insufficient.
    /// FIDE's "any legal sequence" wording would count it.
    pub fn has_mating_material(&self, color: Color) -> bool {
        let heavy = self.pieces(color, PieceKind::Pawn)
            | self.pieces(color, PieceKind::Rook)
            | self.pieces(color, PieceKind::Queen);
        let minors = self.pieces(color, PieceKind::Knight) | self.pieces(color, PieceKind::Bishop);
        heavy.is_not_empty() || minors.popcount() >= 2
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Position {{")?;
        writeln!(f, "  FEN: {}", self.to_fen())?;
        for rank in (0..8u8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8u8 {
                match self.piece_at(Square::new_unchecked(rank * 8 + file)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")?;
        write!(f, "}}")
    }
}
