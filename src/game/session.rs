//! Game session state machine
//!
//! Owns the grid, the running and best scores, and the injected RNG, and
//! sequences engine calls in response to input. At most one transition is
//! ever in flight: input that arrives while a move is being rendered, or
//! after the game has ended, is dropped without queueing.

use rand::Rng;

use super::engine::{self, Direction, MoveReport};
use super::grid::Grid;
use super::spawn::spawn;
use crate::best_score::BestScore;
use crate::consts::{MAX_STARTING_TILES, MIN_STARTING_TILES, WIN_TILE};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// A 2048 tile exists on the grid.
    Won,
    /// Grid is full and no adjacent pair can merge.
    Lost,
}

/// Session lifecycle. Directional input is accepted only while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// A committed move is being rendered; input is dropped.
    TransitionInFlight,
    /// Game over or won; only reset is accepted.
    Terminal(GameEnd),
}

/// Notifications for the presentation layer, drained after each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ScoreChanged { score: u32, delta: u32 },
    BestScoreChanged { best: u32 },
    GameWon { score: u32 },
    GameOver { score: u32 },
}

/// A single game in progress.
pub struct Session<R: Rng> {
    grid: Grid,
    score: u32,
    best: BestScore,
    phase: Phase,
    starting_tiles: u8,
    rng: R,
    events: Vec<SessionEvent>,
}

impl<R: Rng> Session<R> {
    /// Start a fresh game: empty grid seeded with `starting_tiles` spawns.
    pub fn new(starting_tiles: u8, best: BestScore, mut rng: R) -> Self {
        let starting_tiles = starting_tiles.clamp(MIN_STARTING_TILES, MAX_STARTING_TILES);
        let mut grid = Grid::empty();
        for _ in 0..starting_tiles {
            spawn(&mut grid, &mut rng);
        }
        Self {
            grid,
            score: 0,
            best,
            phase: Phase::Idle,
            starting_tiles,
            rng,
            events: Vec::new(),
        }
    }

    /// Build a session over a prepared grid (deterministic tests, replays).
    pub fn from_grid(grid: Grid, best: BestScore, rng: R) -> Self {
        Self {
            grid,
            score: 0,
            best,
            phase: Phase::Idle,
            starting_tiles: crate::consts::DEFAULT_STARTING_TILES,
            rng,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn starting_tiles(&self) -> u8 {
        self.starting_tiles
    }

    /// Change the number of tiles seeded by the next reset.
    pub fn set_starting_tiles(&mut self, count: u8) {
        self.starting_tiles = count.clamp(MIN_STARTING_TILES, MAX_STARTING_TILES);
    }

    /// Apply a directional move.
    ///
    /// Returns `None` and stays put when the session is not `Idle` (input
    /// dropped) or when the move changes nothing (a no-op, not an error).
    /// On an accepted move: commits the new grid, adds the merge score,
    /// updates the best score write-through, spawns one tile, enters
    /// `TransitionInFlight`, and hands back the full report.
    pub fn handle_direction(&mut self, direction: Direction) -> Option<MoveReport> {
        if self.phase != Phase::Idle {
            return None;
        }
        let (next, mut report) = engine::apply_direction(&self.grid, direction);
        if !report.did_change {
            return None;
        }

        self.grid = next;
        if report.score_delta > 0 {
            self.score += report.score_delta;
            self.events.push(SessionEvent::ScoreChanged {
                score: self.score,
                delta: report.score_delta,
            });
            if self.best.record(self.score) {
                self.events.push(SessionEvent::BestScoreChanged {
                    best: self.best.value(),
                });
            }
        }
        report.spawned = spawn(&mut self.grid, &mut self.rng);
        self.phase = Phase::TransitionInFlight;
        Some(report)
    }

    /// Signal from the presentation layer that the committed move has been
    /// rendered. Evaluates terminal conditions and either ends the game or
    /// returns to `Idle`.
    pub fn transition_rendered(&mut self) {
        if self.phase != Phase::TransitionInFlight {
            return;
        }
        self.phase = if self.grid.contains_value(WIN_TILE) {
            self.events.push(SessionEvent::GameWon { score: self.score });
            Phase::Terminal(GameEnd::Won)
        } else if !self.grid.has_any_empty_cell() && !self.grid.has_adjacent_equal_pair() {
            self.events.push(SessionEvent::GameOver { score: self.score });
            Phase::Terminal(GameEnd::Lost)
        } else {
            Phase::Idle
        };
    }

    /// Start over from any phase: fresh seeded grid, score 0, best kept.
    pub fn reset(&mut self) {
        self.grid = Grid::empty();
        for _ in 0..self.starting_tiles {
            spawn(&mut self.grid, &mut self.rng);
        }
        self.score = 0;
        self.phase = Phase::Idle;
        self.events.clear();
    }

    /// Take all notifications produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
