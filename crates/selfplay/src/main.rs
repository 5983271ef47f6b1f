//! Perft diagnostics and random timed self-play for arbiter-chess.
//!
//! `perft` and `divide` check the move generator against known node counts.
//! `generate` plays games of uniformly random legal moves under a clock and
//! writes one JSON record per game.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use arbiter_chess::{divide, perft, Color, Position, Status, TimeControl, TimedGame, STARTING_FEN};
use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Arbiter chess diagnostics and self-play tool.
#[derive(Parser)]
#[command(name = "arbiter-selfplay")]
#[command(about = "Count move paths and generate random timed games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the legal-move tree.
    Perft {
        /// Position to start from.
        #[arg(short, long, default_value = STARTING_FEN)]
        fen: String,

        /// Search depth in plies.
        #[arg(short, long, default_value = "4")]
        depth: u32,
    },

    /// Perft split by root move.
    Divide {
        /// Position to start from.
        #[arg(short, long, default_value = STARTING_FEN)]
        fen: String,

        /// Search depth in plies.
        #[arg(short, long, default_value = "3")]
        depth: u32,
    },

    /// Play random timed games and write them as JSON Lines.
    Generate {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Starting time per side, in seconds.
        #[arg(long, default_value = "300")]
        base_secs: u64,

        /// Increment per move, in milliseconds.
        #[arg(long, default_value = "0")]
        increment_ms: u64,

        /// Longest simulated think time per move, in milliseconds.
        #[arg(long, default_value = "5000")]
        max_think_ms: u64,

        /// Stop a game after this many plies.
        #[arg(long, default_value = "400")]
        max_plies: usize,

        /// Output file (one JSON object per line).
        #[arg(short, long, default_value = "games.jsonl")]
        output: PathBuf,
    },
}

/// One finished (or truncated) game.
#[derive(Serialize, Deserialize, Debug)]
struct GameRecord {
    seed: u64,
    /// Moves in coordinate notation.
    moves: Vec<String>,
    status: Status,
    /// `1-0`, `0-1`, `1/2-1/2` or `*` when cut off by the ply limit.
    result: String,
    final_fen: String,
    white_remaining_ms: u64,
    black_remaining_ms: u64,
}

/// Settings shared by every generated game.
#[derive(Clone, Copy, Debug)]
struct GenerateConfig {
    control: TimeControl,
    max_think: Duration,
    max_plies: usize,
}

/// Plays one game of random legal moves with random think times.
fn play_random_game(config: &GenerateConfig, seed: u64) -> Result<GameRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut timed = TimedGame::with_control(config.control);
    let max_think_ms = config.max_think.as_millis() as u64;

    while !timed.game().is_over() && timed.game().moves().len() < config.max_plies {
        let moves = timed.game().legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        let elapsed = Duration::from_millis(rng.gen_range(0..=max_think_ms));
        timed
            .make_timed_move(mv, elapsed)
            .with_context(|| format!("Game {seed}: move {mv} rejected"))?;
    }

    let game = timed.game();
    let remaining_ms = |color: Color| timed.clock(color).remaining().as_millis() as u64;
    Ok(GameRecord {
        seed,
        moves: game.moves().iter().map(|mv| mv.to_string()).collect(),
        status: game.status(),
        result: game.status().result_str().to_string(),
        final_fen: game.position().to_fen(),
        white_remaining_ms: remaining_ms(Color::White),
        black_remaining_ms: remaining_ms(Color::Black),
    })
}

fn parse_fen(fen: &str) -> Result<Position> {
    Position::from_fen(fen).with_context(|| format!("Failed to parse FEN {fen:?}"))
}

/// Run the perft command.
fn cmd_perft(fen: &str, depth: u32) -> Result<()> {
    let position = parse_fen(fen)?;
    info!(%fen, depth, "running perft");

    let start = Instant::now();
    let nodes = perft(&position, depth);
    let elapsed = start.elapsed();

    println!("Nodes: {nodes}");
    println!("Time: {:.3}s", elapsed.as_secs_f64());
    if elapsed.as_secs_f64() > 0.0 {
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}

/// Run the divide command.
fn cmd_divide(fen: &str, depth: u32) -> Result<()> {
    let position = parse_fen(fen)?;
    info!(%fen, depth, "running divide");

    let split = divide(&position, depth);
    for (mv, nodes) in &split {
        println!("{mv}: {nodes}");
    }
    println!("\nMoves: {}", split.len());
    println!("Total: {}", split.values().sum::<u64>());
    Ok(())
}

/// Run the generate command.
fn cmd_generate(games: usize, seed: u64, config: GenerateConfig, output: PathBuf) -> Result<()> {
    info!(
        games,
        seed,
        base_secs = config.control.base.as_secs(),
        increment_ms = config.control.increment.as_millis() as u64,
        "generating games"
    );
    let start = Instant::now();

    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| play_random_game(&config, seed.wrapping_add(i as u64 * 1000)))
        .collect::<Result<_>>()?;

    let file = File::create(&output).with_context(|| format!("Failed to create file: {output:?}"))?;
    let mut writer = BufWriter::new(file);
    for record in &records {
        serde_json::to_writer(&mut writer, record)
            .with_context(|| format!("Failed to serialize game {}", record.seed))?;
        writeln!(writer)?;
    }
    writer.flush()?;

    let total_plies: usize = records.iter().map(|r| r.moves.len()).sum();
    let white_wins = records
        .iter()
        .filter(|r| r.status.winner() == Some(Color::White))
        .count();
    let black_wins = records
        .iter()
        .filter(|r| r.status.winner() == Some(Color::Black))
        .count();
    let draws = records.iter().filter(|r| r.status.is_draw()).count();
    let on_time = records
        .iter()
        .filter(|r| matches!(r.status, Status::WhiteForfeitOnTime | Status::BlackForfeitOnTime))
        .count();
    let unfinished = records.iter().filter(|r| !r.status.is_terminal()).count();

    println!("Completed in {:.2}s", start.elapsed().as_secs_f64());
    println!("Games generated: {}", records.len());
    if !records.is_empty() {
        println!(
            "Average game length: {:.1} plies",
            total_plies as f64 / records.len() as f64
        );
    }
    println!(
        "Outcomes: White wins: {white_wins}, Black wins: {black_wins}, Draws: {draws}, Unfinished: {unfinished}"
    );
    println!("Decided on time: {on_time}");
    println!("Saved to: {output:?}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Perft { fen, depth } => cmd_perft(&fen, depth),
        Commands::Divide { fen, depth } => cmd_divide(&fen, depth),
        Commands::Generate {
            games,
            seed,
            base_secs,
            increment_ms,
            max_think_ms,
            max_plies,
            output,
        } => {
            let config = GenerateConfig {
                control: TimeControl::fischer(
                    Duration::from_secs(base_secs),
                    Duration::from_millis(increment_ms),
                ),
                max_think: Duration::from_millis(max_think_ms),
                max_plies,
            };
            cmd_generate(games, seed, config, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_plies: usize) -> GenerateConfig {
        GenerateConfig {
            control: TimeControl::fischer(Duration::from_secs(60), Duration::from_millis(500)),
            max_think: Duration::from_millis(2000),
            max_plies,
        }
    }

    #[test]
    fn test_random_game_is_reproducible() {
        let a = play_random_game(&config(80), 7).unwrap();
        let b = play_random_game(&config(80), 7).unwrap();
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.status, b.status);
        assert_eq!(a.white_remaining_ms, b.white_remaining_ms);
    }

    #[test]
    fn test_random_game_respects_ply_limit() {
        let record = play_random_game(&config(10), 3).unwrap();
        assert!(record.moves.len() <= 10);
        if record.moves.len() == 10 {
            assert_eq!(record.status, Status::InProgress);
            assert_eq!(record.result, "*");
        }
    }

    #[test]
    fn test_record_moves_replay() {
        let record = play_random_game(&config(60), 11).unwrap();
        let mut position = Position::starting();
        for text in &record.moves {
            let mv = position.parse_move(text).unwrap();
            position = position.make_move(mv).unwrap();
        }
        assert_eq!(position.to_fen(), record.final_fen);
    }

    #[test]
    fn test_record_serializes_as_one_line() {
        let record = play_random_game(&config(20), 5).unwrap();
        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains('\n'));
        let back: GameRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back.moves, record.moves);
        assert_eq!(back.status, record.status);
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "arbiter-selfplay",
            "generate",
            "--games",
            "4",
            "--base-secs",
            "30",
            "--increment-ms",
            "250",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                games,
                base_secs,
                increment_ms,
                max_plies,
                ..
            } => {
                assert_eq!(games, 4);
                assert_eq!(base_secs, 30);
                assert_eq!(increment_ms, 250);
                assert_eq!(max_plies, 400);
            }
            _ => panic!("expected generate"),
        }
    }
}
