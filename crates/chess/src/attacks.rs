//! Precomputed attack geometry.
//!
//! Leapers (pawn, knight, king) use one lookup per square. Sliders use one ray
//! per direction and square: the ray is cut at its first blocker, found with
//! `lsb` for directions that increase the square index and `msb` otherwise.

use std::sync::OnceLock;

use crate::{Bitboard, Color, PieceKind, Square};

/// The eight ray directions as (file delta, rank delta).
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),   // north
    (1, 1),   // north-east
    (1, 0),   // east
    (-1, 1),  // north-west
    (0, -1),  // south
    (-1, -1), // south-west
    (-1, 0),  // west
    (1, -1),  // south-east
];

/// Directions 0..4 increase the square index, 4..8 decrease it.
const FIRST_NEGATIVE: usize = 4;

const ROOK_DIRECTIONS: [usize; 4] = [0, 2, 4, 6];
const BISHOP_DIRECTIONS: [usize; 4] = [1, 3, 5, 7];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Lookup tables shared by attack detection and move generation.
pub struct AttackTables {
    /// Squares a pawn of [color] on [square] attacks
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    /// Squares strictly beyond [square] in [direction], up to the edge
    rays: [[Bitboard; 64]; 8],
}

impl AttackTables {
    fn init() -> Self {
        let mut tables = AttackTables {
            pawn: [[Bitboard::EMPTY; 64]; 2],
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            rays: [[Bitboard::EMPTY; 64]; 8],
        };

        for sq in Square::all() {
            let bb = sq.bitboard();
            tables.pawn[Color::White.index()][sq.index()] = bb.north_east() | bb.north_west();
            tables.pawn[Color::Black.index()][sq.index()] = bb.south_east() | bb.south_west();

            tables.knight[sq.index()] = KNIGHT_JUMPS
                .iter()
                .filter_map(|&(df, dr)| sq.offset(df, dr))
                .collect();

            tables.king[sq.index()] = DIRECTIONS
                .iter()
                .filter_map(|&(df, dr)| sq.offset(df, dr))
                .collect();

            for (dir, &(df, dr)) in DIRECTIONS.iter().enumerate() {
                let mut ray = Bitboard::EMPTY;
                let mut cursor = sq.offset(df, dr);
                while let Some(next) = cursor {
                    ray.set(next);
                    cursor = next.offset(df, dr);
                }
                tables.rays[dir][sq.index()] = ray;
            }
        }

        tables
    }

    #[inline]
    pub fn pawn_attacks(&self, sq: Square, color: Color) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    /// Ray from `sq` in one direction, stopping at (and including) the first occupied square.
    #[inline]
    fn ray_attacks(&self, dir: usize, sq: Square, occupancy: Bitboard) -> Bitboard {
        let ray = self.rays[dir][sq.index()];
        let blockers = ray & occupancy;
        let first = if dir < FIRST_NEGATIVE {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        match first {
            Some(blocker) => ray ^ self.rays[dir][blocker.index()],
            None => ray,
        }
    }

    pub fn rook_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        ROOK_DIRECTIONS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &dir| acc | self.ray_attacks(dir, sq, occupancy))
    }

    pub fn bishop_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        BISHOP_DIRECTIONS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &dir| acc | self.ray_attacks(dir, sq, occupancy))
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupancy) | self.bishop_attacks(sq, occupancy)
    }

    /// Attack set of a non-pawn piece kind. Pawns attack by color, see [`Self::pawn_attacks`].
    pub fn piece_attacks(&self, kind: PieceKind, sq: Square, occupancy: Bitboard) -> Bitboard {
        match kind {
            PieceKind::Knight => self.knight_attacks(sq),
            PieceKind::Bishop => self.bishop_attacks(sq, occupancy),
            PieceKind::Rook => self.rook_attacks(sq, occupancy),
            PieceKind::Queen => self.queen_attacks(sq, occupancy),
            PieceKind::King => self.king_attacks(sq),
            PieceKind::Pawn => Bitboard::EMPTY,
        }
    }
}

static ATTACKS: OnceLock<AttackTables> = OnceLock::new();

/// The process-wide attack tables, built on first use.
pub fn attacks() -> &'static AttackTables {
    ATTACKS.get_or_init(AttackTables::init)
}
