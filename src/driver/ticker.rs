use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic tick source for the simulation.
///
/// Wraps a tokio interval so the driver can `select!` on it next to input
/// events instead of parking a thread in a sleep loop. The first tick fires
/// one full period after creation.
pub struct Ticker {
    interval: Interval,
    period: Duration,
    count: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            interval: delayed_interval(period),
            period,
            count: 0,
        }
    }

    /// Wait for the next tick and return its sequence number, starting at 1
    pub async fn tick(&mut self) -> u64 {
        self.interval.tick().await;
        self.count += 1;
        self.count
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change the period; the next tick fires one new period from now
    pub fn set_period(&mut self, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        if period == self.period {
            return;
        }
        self.period = period;
        self.interval = delayed_interval(period);
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

fn delayed_interval(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    // A slow frame must not trigger a burst of catch-up moves
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
