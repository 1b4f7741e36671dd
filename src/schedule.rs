use std::time::{Duration, Instant};

pub const INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(3000);

/// Deadline bookkeeping for the refresh timer.
///
/// The UI loop asks whether a tick is due; after running it the tick is pushed
/// out by the interval. Once shut down nothing is ever due again.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    next_due: Instant,
    shut_down: bool,
}

impl TickScheduler {
    pub fn new(now: Instant, initial_delay: Duration, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + initial_delay,
            shut_down: false,
        }
    }

    pub fn starting_at(now: Instant) -> Self {
        Self::new(now, INITIAL_DELAY, REFRESH_INTERVAL)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.shut_down && now >= self.next_due
    }

    pub fn reschedule(&mut self, finished_at: Instant) {
        self.next_due = finished_at + self.interval;
    }

    /// Time left before the next tick, `None` once shut down.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.shut_down {
            None
        } else {
            Some(self.next_due.saturating_duration_since(now))
        }
    }

    pub fn shutdown(&mut self) {
        self.shut_down = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
