//! Move-path enumeration for validating the generator against known counts.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{Move, Position};

/// Number of leaf nodes of the legal-move tree of the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .filter_map(|mv| position.make_move(mv).ok())
        .map(|next| perft(&next, depth - 1))
        .sum()
}

/// Perft split by root move.
pub fn divide(position: &Position, depth: u32) -> BTreeMap<Move, u64> {
    let mut counts = BTreeMap::new();
    if depth == 0 {
        return counts;
    }
    for mv in position.legal_moves() {
        let Ok(next) = position.make_move(mv) else {
            continue;
        };
        let nodes = perft(&next, depth - 1);
        trace!(%mv, nodes, "divide");
        counts.insert(mv, nodes);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_zero() {
        assert_eq!(perft(&Position::starting(), 0), 1);
        assert!(divide(&Position::starting(), 0).is_empty());
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let start = Position::starting();
        let split = divide(&start, 2);
        assert_eq!(split.len(), 20);
        assert!(split.values().all(|&n| n == 20));
        assert_eq!(split.values().sum::<u64>(), perft(&start, 2));
    }
}
