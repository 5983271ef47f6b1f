//! Per-side clocks for timed play.
//!
//! Elapsed time is always supplied by the caller; nothing here reads the wall
//! clock, so timed games replay deterministically.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ChessError, Color, Game, Move, Result, Status};

/// How much time a side gets and how it is replenished.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TimeControl {
    /// Time at the start, and the bonus granted when a control period is completed
    pub base: Duration,
    /// Moves per control period; 0 means the whole game is one period
    pub moves_per_control: u32,
    /// Added to the mover's clock on every move
    pub increment: Duration,
    /// Whether the control period repeats once completed
    pub resets: bool,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::sudden_death(Duration::from_secs(300))
    }
}

impl TimeControl {
    pub fn new(base: Duration, moves_per_control: u32, increment: Duration, resets: bool) -> Self {
        TimeControl {
            base,
            moves_per_control,
            increment,
            resets,
        }
    }

    /// A single period with no increment.
    pub fn sudden_death(base: Duration) -> Self {
        Self::new(base, 0, Duration::ZERO, false)
    }

    /// A single period with a per-move increment.
    pub fn fischer(base: Duration, increment: Duration) -> Self {
        Self::new(base, 0, increment, false)
    }

    /// `moves` moves in `base`, repeating.
    pub fn classical(base: Duration, moves: u32) -> Self {
        Self::new(base, moves, Duration::ZERO, true)
    }
}

/// One side's clock.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Clock {
    control: TimeControl,
    remaining: Duration,
    /// Moves made in the current control period
    moves_in_period: u32,
    /// Set once a non-repeating period bonus has been granted
    periods_done: bool,
}

impl Clock {
    pub fn new(control: TimeControl) -> Self {
        Clock {
            control,
            remaining: control.base,
            moves_in_period: 0,
            periods_done: false,
        }
    }

    #[inline]
    pub fn control(&self) -> &TimeControl {
        &self.control
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[inline]
    pub fn moves_in_period(&self) -> u32 {
        self.moves_in_period
    }

    #[inline]
    pub fn is_flagged(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Credits the increment and debits `elapsed`, stopping at zero.
    fn charge_move(&mut self, elapsed: Duration) {
        self.remaining = self
            .remaining
            .saturating_add(self.control.increment)
            .saturating_sub(elapsed);
    }

    fn charge(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.saturating_sub(elapsed);
    }

    /// Counts a completed move toward the control period and grants the base
    /// time again when the period is done.
    fn complete_move(&mut self) {
        if self.control.moves_per_control == 0 || self.periods_done {
            return;
        }
        self.moves_in_period += 1;
        if self.moves_in_period >= self.control.moves_per_control {
            self.remaining = self.remaining.saturating_add(self.control.base);
            self.moves_in_period = 0;
            self.periods_done = !self.control.resets;
        }
    }
}

/// A [`Game`] played against two clocks.
#[derive(Clone, Debug)]
pub struct TimedGame {
    game: Game,
    clocks: [Clock; 2],
}

impl TimedGame {
    pub fn new(game: Game, white: TimeControl, black: TimeControl) -> Self {
        TimedGame {
            game,
            clocks: [Clock::new(white), Clock::new(black)],
        }
    }

    /// Both sides under the same control, from the initial position.
    pub fn with_control(control: TimeControl) -> Self {
        Self::new(Game::new(), control, control)
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.game.status()
    }

    #[inline]
    pub fn clock(&self, color: Color) -> &Clock {
        &self.clocks[color.index()]
    }

    /// Plays `mv` after `elapsed` of thinking time.
    ///
    /// The mover is credited the increment and charged `elapsed`. If that
    /// empties the clock the mover forfeits, whatever happened on the board,
    /// unless the opponent has no mating material, in which case the game is
    /// drawn. A rejected move leaves the clocks unchanged.
    pub fn make_timed_move(&mut self, mv: Move, elapsed: Duration) -> Result<Status> {
        let mover = self.game.side_to_move();
        self.game.apply_move(mv)?;

        let clock = &mut self.clocks[mover.index()];
        clock.charge_move(elapsed);
        if clock.is_flagged() {
            self.time_out(mover);
        } else {
            clock.complete_move();
        }
        Ok(self.game.status())
    }

    /// Charges `elapsed` to the side to move without a move being made.
    pub fn flag(&mut self, elapsed: Duration) -> Result<Status> {
        if self.game.is_over() {
            return Err(ChessError::GameOver(self.game.status()));
        }
        let side = self.game.side_to_move();
        let clock = &mut self.clocks[side.index()];
        clock.charge(elapsed);
        if clock.is_flagged() {
            self.time_out(side);
        }
        Ok(self.game.status())
    }

    fn time_out(&mut self, loser: Color) {
        let opponent = loser.opposite();
        let status = if self.game.position().has_mating_material(opponent) {
            Status::forfeit_on_time(loser)
        } else {
            Status::DrawInsufficientMaterial
        };
        info!(%loser, %status, "clock ran out");
        self.game.conclude(status);
    }
}
