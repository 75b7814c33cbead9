//! Headless autoplay
//!
//! Runs the engine as fast as it will go with a greedy autopilot at the
//! controls. Useful for smoke-testing a configuration and for reproducing a
//! seeded game without a terminal.
//!
//! # Example
//!
//! ```rust
//! use tap_snake::game::GameConfig;
//! use tap_snake::modes::AutoplayMode;
//!
//! let config = GameConfig { seed: Some(1), ..Default::default() };
//! let mut mode = AutoplayMode::new(config, 500).unwrap();
//! let report = mode.run();
//! assert!(report.ticks <= 500);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::driver::Session;
use crate::game::{Action, Cell, Direction, GameConfig, GameEngine, Grid, Snapshot, TickOutcome};
use crate::metrics::{GameMetrics, MetricsSummary};

/// Picks a turn each tick: head for the exit once it is open, otherwise for
/// the food, never into a wall or the body if any other move is safe.
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    pub fn choose(&self, grid: &Grid, snapshot: &Snapshot) -> Option<Direction> {
        let head = snapshot.head()?;
        let target = snapshot.exit.or(snapshot.food)?;
        let heading = snapshot.direction;

        // Ties keep the current heading
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|direction| !direction.is_opposite(heading))
            .map(|direction| (direction, head.stepped(direction, grid.cell_size())))
            .filter(|(_, next)| !grid.is_wall(*next) && !snapshot.snake.contains(next))
            .min_by_key(|(direction, next)| (distance(*next, target), *direction != heading))
            .map(|(direction, _)| direction)
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

fn distance(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// What an autoplay run produced
#[derive(Debug, Clone, Serialize)]
pub struct AutoplayReport {
    /// Ticks driven, across every game in the run
    pub ticks: u64,
    pub metrics: MetricsSummary,
    /// State after the last tick
    pub last: Snapshot,
}

pub struct AutoplayMode {
    session: Session,
    autopilot: Autopilot,
    metrics: GameMetrics,
    max_ticks: u64,
}

impl AutoplayMode {
    pub fn new(config: GameConfig, max_ticks: u64) -> Result<Self> {
        let engine = GameEngine::new(&config).context("Invalid game configuration")?;

        Ok(Self {
            session: Session::new(engine),
            autopilot: Autopilot::new(),
            metrics: GameMetrics::new(),
            max_ticks,
        })
    }

    /// Play until the snake escapes or the tick budget runs out.
    /// Crashed games are restarted.
    pub fn run(&mut self) -> AutoplayReport {
        let mut ticks = 0;

        while ticks < self.max_ticks {
            let snapshot = self.session.snapshot();
            if snapshot.lost {
                self.session.push(Action::Restart);
            } else if let Some(direction) =
                self.autopilot.choose(self.session.engine().grid(), &snapshot)
            {
                self.session.push(Action::Steer(direction));
            }

            let Some(outcome) = self.session.advance() else {
                break;
            };
            ticks += 1;

            self.metrics.record(outcome, &self.session.snapshot());
            match outcome {
                TickOutcome::Lost {
                    collision,
                    forfeited_score,
                } => debug!(?collision, forfeited_score, "autopilot crashed"),
                TickOutcome::Won { .. } => break,
                TickOutcome::Moved { .. } | TickOutcome::Idle => {}
            }
        }

        self.metrics.update();
        let report = AutoplayReport {
            ticks,
            metrics: self.metrics.summary(),
            last: self.session.snapshot(),
        };

        info!(
            ticks = report.ticks,
            games = report.metrics.games_played,
            wins = report.metrics.wins,
            high_score = report.metrics.high_score,
            longest = report.metrics.longest_snake,
            "autoplay finished"
        );

        report
    }
}
