//! Move generation.
//!
//! Pseudo-legal moves follow piece movement rules and castling conditions but
//! may leave the mover's king attacked. Legal moves are the pseudo-legal moves
//! whose resulting position does not have the mover in check.

use crate::position::CastleSide;
use crate::{attacks, Bitboard, Color, Move, Piece, PieceKind, Position, Square};

/// Which promotion kinds the generator emits for a pawn reaching the last rank.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PromotionPolicy {
    /// Knight, bishop, rook and queen.
    #[default]
    AllKinds,
    /// Queen only.
    QueenOnly,
}

impl PromotionPolicy {
    fn kinds(self) -> &'static [PieceKind] {
        match self {
            PromotionPolicy::AllKinds => &PieceKind::PROMOTIONS,
            PromotionPolicy::QueenOnly => &[PieceKind::Queen],
        }
    }
}

impl Position {
    /// All legal moves for the side to move, sorted ascending.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_with(PromotionPolicy::AllKinds)
    }

    /// Legal moves with a choice of promotion kinds, sorted ascending.
    pub fn legal_moves_with(&self, policy: PromotionPolicy) -> Vec<Move> {
        let us = self.side_to_move();
        let mut moves = self.generate(policy);
        moves.retain(|&mv| match self.make_move(mv) {
            Ok(next) => !next.in_check(us),
            Err(_) => false,
        });
        moves
    }

    /// All pseudo-legal moves for the side to move, sorted ascending.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        self.generate(PromotionPolicy::AllKinds)
    }

    /// True if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        let us = self.side_to_move();
        self.generate(PromotionPolicy::QueenOnly)
            .into_iter()
            .any(|mv| self.make_move(mv).is_ok_and(|next| !next.in_check(us)))
    }

    fn generate(&self, policy: PromotionPolicy) -> Vec<Move> {
        let us = self.side_to_move();
        let mut moves = Vec::with_capacity(64);

        self.generate_pawn_moves(us, policy, &mut moves);
        self.generate_piece_moves(us, &mut moves);
        self.generate_castling_moves(us, &mut moves);

        moves.sort_unstable();
        moves
    }

    fn generate_pawn_moves(&self, us: Color, policy: PromotionPolicy, moves: &mut Vec<Move>) {
        let tables = attacks();
        let pawns = self.pieces(us, PieceKind::Pawn);
        let empty = !self.all_pieces();
        let enemies = self.occupancy(us.opposite());
        let step = us.pawn_direction();

        let mut push = |from: Square, to: Square| {
            if to.rank() == us.promotion_rank() {
                for &kind in policy.kinds() {
                    moves.push(Move::promotion_to(from, to, kind));
                }
            } else {
                moves.push(Move::normal(from, to));
            }
        };

        for from in pawns {
            // A pawn standing on its own last rank has nowhere to go.
            let Some(one) = from.offset(0, step) else {
                continue;
            };
            if empty.contains(one) {
                push(from, one);
                if from.rank() == us.pawn_start_rank() {
                    if let Some(two) = one.offset(0, step) {
                        if empty.contains(two) {
                            push(from, two);
                        }
                    }
                }
            }

            let mut targets = tables.pawn_attacks(from, us) & enemies;
            if let Some(ep) = self.en_passant_square() {
                let victim = Square::new_unchecked(from.rank() * 8 + ep.file());
                if empty.contains(ep)
                    && tables.pawn_attacks(from, us).contains(ep)
                    && self.piece_at(victim) == Some(Piece::new(us.opposite(), PieceKind::Pawn))
                {
                    targets.set(ep);
                }
            }
            for to in targets {
                push(from, to);
            }
        }
    }

    /// Knights, bishops, rooks, queens and ordinary king steps.
    fn generate_piece_moves(&self, us: Color, moves: &mut Vec<Move>) {
        let tables = attacks();
        let occ = self.all_pieces();
        let not_ours = !self.occupancy(us);

        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            for from in self.pieces(us, kind) {
                let targets = tables.piece_attacks(kind, from, occ) & not_ours;
                moves.extend(targets.iter().map(|to| Move::normal(from, to)));
            }
        }
    }

    fn generate_castling_moves(&self, us: Color, moves: &mut Vec<Move>) {
        let rights = self.castling_rights();
        if rights.is_empty() {
            return;
        }

        let them = us.opposite();
        let rank = us.back_rank();
        let at = |file: u8| Square::new_unchecked(rank * 8 + file);
        let king_from = at(4);

        if self.piece_at(king_from).map(|p| (p.color, p.kind)) != Some((us, PieceKind::King)) {
            return;
        }
        // Can't castle out of check
        if self.is_attacked(king_from, them) {
            return;
        }

        for side in CastleSide::BOTH {
            if !rights.has(us, side) {
                continue;
            }
            let (rook_file, _, king_file) = side.files();
            if self.piece_at(at(rook_file)).map(|p| (p.color, p.kind)) != Some((us, PieceKind::Rook))
            {
                continue;
            }

            let (low, high) = (rook_file.min(4) + 1, rook_file.max(4));
            let between: Bitboard = (low..high).map(at).collect();
            if (self.all_pieces() & between).is_not_empty() {
                continue;
            }

            // The king's transit and landing squares must be safe.
            let (low, high) = (king_file.min(4), king_file.max(4));
            let path_safe = (low..=high)
                .filter(|&file| file != 4)
                .all(|file| !self.is_attacked(at(file), them));
            if path_safe {
                moves.push(Move::normal(king_from, at(king_file)));
            }
        }
    }
}
