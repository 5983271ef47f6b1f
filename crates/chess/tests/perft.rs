//! Perft regression counts.
//!
//! Leaf counts of the legal-move tree must match the published values for
//! these positions; any generator bug shows up as a mismatch.

use arbiter_chess::{divide, perft, Color, Move, Piece, Position, Square};

fn fen(text: &str) -> Position {
    Position::from_fen(text).unwrap()
}

// =============================================================================
// Starting position
// =============================================================================

#[test]
fn test_perft_starting_depth_1() {
    assert_eq!(perft(&Position::starting(), 1), 20);
}

#[test]
fn test_perft_starting_depth_2() {
    assert_eq!(perft(&Position::starting(), 2), 400);
}

#[test]
fn test_perft_starting_depth_3() {
    assert_eq!(perft(&Position::starting(), 3), 8_902);
}

#[test]
fn test_perft_starting_depth_4() {
    assert_eq!(perft(&Position::starting(), 4), 197_281);
}

#[test]
#[ignore = "slow; run with --ignored"]
fn test_perft_starting_depth_5() {
    assert_eq!(perft(&Position::starting(), 5), 4_865_609);
}

// =============================================================================
// Kiwipete: castling, pins and en passant all at once
// =============================================================================

fn kiwipete() -> Position {
    fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
}

#[test]
fn test_perft_kiwipete_depth_1() {
    assert_eq!(perft(&kiwipete(), 1), 48);
}

#[test]
fn test_perft_kiwipete_depth_2() {
    assert_eq!(perft(&kiwipete(), 2), 2_039);
}

#[test]
fn test_perft_kiwipete_depth_3() {
    assert_eq!(perft(&kiwipete(), 3), 97_862);
}

// =============================================================================
// Position 3: en passant with discovered checks along the rank
// =============================================================================

fn position3() -> Position {
    fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")
}

#[test]
fn test_perft_position3_depth_1() {
    assert_eq!(perft(&position3(), 1), 14);
}

#[test]
fn test_perft_position3_depth_2() {
    assert_eq!(perft(&position3(), 2), 191);
}

#[test]
fn test_perft_position3_depth_3() {
    assert_eq!(perft(&position3(), 3), 2_812);
}

#[test]
fn test_perft_position3_depth_4() {
    assert_eq!(perft(&position3(), 4), 43_238);
}

// =============================================================================
// Position 4: promotions and castling rights lost to captures
// =============================================================================

fn position4() -> Position {
    fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
}

#[test]
fn test_perft_position4_depth_1() {
    assert_eq!(perft(&position4(), 1), 6);
}

#[test]
fn test_perft_position4_depth_2() {
    assert_eq!(perft(&position4(), 2), 264);
}

#[test]
fn test_perft_position4_depth_3() {
    assert_eq!(perft(&position4(), 3), 9_467);
}

// =============================================================================
// Position 5
// =============================================================================

fn position5() -> Position {
    fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8")
}

#[test]
fn test_perft_position5_depth_1() {
    assert_eq!(perft(&position5(), 1), 44);
}

#[test]
fn test_perft_position5_depth_2() {
    assert_eq!(perft(&position5(), 2), 1_486);
}

#[test]
fn test_perft_position5_depth_3() {
    assert_eq!(perft(&position5(), 3), 62_379);
}

// =============================================================================
// Position 6
// =============================================================================

fn position6() -> Position {
    fen("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10")
}

#[test]
fn test_perft_position6_depth_1() {
    assert_eq!(perft(&position6(), 1), 46);
}

#[test]
fn test_perft_position6_depth_2() {
    assert_eq!(perft(&position6(), 2), 2_079);
}

#[test]
fn test_perft_position6_depth_3() {
    assert_eq!(perft(&position6(), 3), 89_890);
}

// =============================================================================
// Hand-built boards
// =============================================================================

#[test]
fn test_perft_lone_pawn_without_kings() {
    let mut pos = Position::starting();
    pos.clear();
    pos.put(Square::E2, Piece::WHITE_PAWN);
    assert_eq!(perft(&pos, 1), 2);
}

#[test]
fn test_divide_bare_kings() {
    let mut pos = Position::starting();
    pos.clear();
    pos.put(Square::A1, Piece::WHITE_KING);
    pos.put(Square::A8, Piece::BLACK_KING);
    assert_eq!(pos.side_to_move(), Color::White);

    let split = divide(&pos, 1);
    let expected: Vec<Move> = ["a1b1", "a1a2", "a1b2"]
        .iter()
        .map(|m| m.parse().unwrap())
        .collect();
    assert_eq!(split.keys().copied().collect::<Vec<_>>(), expected);
    assert!(split.values().all(|&n| n == 1));
}

#[test]
fn test_divide_matches_perft_on_kiwipete() {
    let pos = kiwipete();
    let split = divide(&pos, 2);
    assert_eq!(split.len(), 48);
    assert_eq!(split.values().sum::<u64>(), 2_039);
}
