use std::time::{Duration, Instant};

use serde::Serialize;

use crate::game::{Snapshot, TickOutcome};

/// Tallies across every game of a session.
///
/// The clock measures the current game only and stops when it ends, so the
/// game-over panel shows how long the last run lasted.
pub struct GameMetrics {
    game_started: Instant,
    running: bool,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub wins: u32,
    pub longest_snake: usize,
}

/// Serializable copy of the tallies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub high_score: u32,
    pub games_played: u32,
    pub wins: u32,
    pub longest_snake: usize,
    pub elapsed_secs: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            game_started: Instant::now(),
            running: true,
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            wins: 0,
            longest_snake: 0,
        }
    }

    /// Refresh the clock; a finished game keeps its final time
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.game_started.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.game_started = Instant::now();
        self.running = true;
        self.elapsed_time = Duration::ZERO;
    }

    /// Fold one tick into the tallies.
    ///
    /// A crash zeroes the score in the snapshot, so the high score comes
    /// from the forfeited value carried by the outcome.
    pub fn record(&mut self, outcome: TickOutcome, snapshot: &Snapshot) {
        self.longest_snake = self.longest_snake.max(snapshot.snake.len());

        let final_score = match outcome {
            TickOutcome::Lost {
                forfeited_score, ..
            } => forfeited_score,
            TickOutcome::Won { .. } => {
                self.wins += 1;
                snapshot.score
            }
            TickOutcome::Moved { .. } => {
                // First move of a fresh game
                if snapshot.ticks == 1 {
                    self.on_game_start();
                }
                return;
            }
            TickOutcome::Idle => return,
        };

        self.update();
        self.running = false;
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    /// `mm:ss`; minutes keep counting past an hour
    pub fn format_time(&self) -> String {
        let secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            high_score: self.high_score,
            games_played: self.games_played,
            wins: self.wins,
            longest_snake: self.longest_snake,
            elapsed_secs: self.elapsed_time.as_secs(),
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
