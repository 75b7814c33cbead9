use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::game::{Action, GameEngine, Snapshot, TickOutcome};

/// Single owner of a running game.
///
/// Inputs arriving between ticks are queued and applied in order right
/// before the next tick, so a tick never observes a half-applied input and
/// readers only ever get copies of the state.
pub struct Session<R = StdRng> {
    engine: GameEngine<R>,
    pending: VecDeque<Action>,
    paused: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(engine: GameEngine<R>) -> Self {
        Self {
            engine,
            pending: VecDeque::new(),
            paused: false,
        }
    }

    /// Queue an input for the next tick
    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip the pause flag and return the new value
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Drain queued inputs into the engine and run one tick.
    ///
    /// Returns `None` while paused; queued inputs are kept for later.
    pub fn advance(&mut self) -> Option<TickOutcome> {
        if self.paused {
            return None;
        }

        while let Some(action) = self.pending.pop_front() {
            self.engine.apply(action);
        }

        Some(self.engine.tick())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }
}
