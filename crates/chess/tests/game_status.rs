//! Game status transitions: mate, draws, resignation and rejected moves.

use arbiter_chess::{ChessError, Color, Game, Move, Piece, Position, Square, Status};

fn game_from(fen: &str) -> Game {
    Game::from_position(Position::from_fen(fen).unwrap()).unwrap()
}

fn play(game: &mut Game, moves: &[&str]) -> Vec<Status> {
    moves
        .iter()
        .map(|text| {
            let mv = game.parse_move(text).unwrap();
            game.apply_move(mv).unwrap()
        })
        .collect()
}

#[test]
fn test_checkmate() {
    let mut game = Game::new();
    let statuses = play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(
        statuses,
        [
            Status::InProgress,
            Status::InProgress,
            Status::InProgress,
            Status::WhiteCheckmated
        ]
    );
    assert!(game.position().in_check(Color::White));
}

#[test]
fn test_stalemate() {
    let mut game = game_from("k7/8/8/1Q6/8/8/8/2K5 w - - 0 1");
    assert_eq!(game.status(), Status::InProgress);
    let status = game.apply_move(Move::normal(Square::B5, Square::B6)).unwrap();
    assert_eq!(status, Status::DrawStalemate);
    assert!(status.is_draw());
}

#[test]
fn test_insufficient_material_after_capture() {
    let mut game = game_from("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
    let status = game.apply_move(Move::normal(Square::E1, Square::D2)).unwrap();
    assert_eq!(status, Status::DrawInsufficientMaterial);
}

#[test]
fn test_dead_position_is_terminal_from_the_start() {
    let game = game_from("4k3/8/8/8/8/8/8/4KB2 w - - 0 1");
    assert_eq!(game.status(), Status::DrawInsufficientMaterial);
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_threefold_declared_on_third_occurrence() {
    let mut game = Game::new();
    let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    let first = play(&mut game, &cycle);
    assert!(first.iter().all(|s| *s == Status::InProgress));
    assert_eq!(game.repetition_count(&Position::starting()), 2);

    let second = play(&mut game, &cycle);
    assert_eq!(&second[..3], &[Status::InProgress; 3]);
    assert_eq!(second[3], Status::DrawThreefold);
    assert_eq!(game.repetition_count(game.position()), 3);
}

#[test]
fn test_repetition_ignores_move_counters() {
    let mut game = Game::new();
    play(&mut game, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    // Same placement as the start, but with different clocks.
    assert_eq!(game.position().halfmove_clock(), 4);
    assert_eq!(game.position().fullmove_number(), 3);
    assert_eq!(game.repetition_count(game.position()), 2);
}

#[test]
fn test_fifty_move_rule_at_exactly_one_hundred() {
    let mut game = game_from("4k3/4p3/8/8/8/8/8/R3K3 w - - 98 80");
    let statuses = play(&mut game, &["a1a2", "e8d8"]);
    assert_eq!(statuses, [Status::InProgress, Status::DrawFiftyMove]);
    assert_eq!(game.position().halfmove_clock(), 100);
}

#[test]
fn test_pawn_move_at_ninety_nine_resets_the_count() {
    let mut game = game_from("4k3/4p3/8/8/8/8/8/R3K3 w - - 98 80");
    let statuses = play(&mut game, &["a1a2", "e7e6", "a2a3"]);
    assert!(statuses.iter().all(|s| *s == Status::InProgress));
    assert_eq!(game.position().halfmove_clock(), 1);
}

#[test]
fn test_capture_at_ninety_nine_resets_the_count() {
    let mut game = game_from("4k3/8/8/8/8/8/7r/R3K3 w - - 98 80");
    let statuses = play(&mut game, &["a1a2"]);
    assert_eq!(statuses, [Status::InProgress]);
    assert_eq!(game.position().halfmove_clock(), 99);

    let statuses = play(&mut game, &["h2a2"]);
    assert_eq!(statuses, [Status::InProgress]);
    assert_eq!(game.position().halfmove_clock(), 0);
}

#[test]
fn test_terminal_game_rejects_everything() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    let before = game.position().clone();

    let mv = Move::normal(Square::E1, Square::F2);
    assert_eq!(
        game.apply_move(mv),
        Err(ChessError::GameOver(Status::WhiteCheckmated))
    );
    assert_eq!(
        game.resign(Color::White),
        Err(ChessError::GameOver(Status::WhiteCheckmated))
    );
    assert_eq!(game.position(), &before);
    assert_eq!(game.moves().len(), 4);
}

#[test]
fn test_illegal_moves_leave_game_unchanged() {
    let mut game = game_from("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1");
    let before = game.position().clone();

    // The rook on h1 gives check, so castling is off the table.
    assert!(game.position().is_check());
    let castle = Move::normal(Square::E1, Square::C1);
    assert_eq!(game.apply_move(castle), Err(ChessError::IllegalMove(castle)));

    let wrong_side = Move::normal(Square::E8, Square::E7);
    assert_eq!(
        game.apply_move(wrong_side),
        Err(ChessError::IllegalMove(wrong_side))
    );
    assert_eq!(game.position(), &before);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.status(), Status::InProgress);
}

#[test]
fn test_resignation() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(game.resign(Color::Black), Ok(Status::BlackResigned));
    assert_eq!(game.status().winner(), Some(Color::White));
}

#[test]
fn test_parse_bare_promotion() {
    let mut pos = Position::starting();
    pos.clear();
    pos.put(Square::E7, Piece::WHITE_PAWN);
    pos.put(Square::E1, Piece::WHITE_KING);
    pos.put(Square::A8, Piece::BLACK_KING);
    assert_eq!(pos.parse_move("e7e8"), pos.parse_move("e7e8q"));
    assert_eq!(pos.parse_move("e7e8").unwrap().to_string(), "e7e8q");
}
