//! Time sources for the frame loop.

use std::{
    cell::Cell,
    time::{Duration, Instant},
};

/// A monotonic time source measured from its own epoch (process start for the
/// system clock).
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Tracks the previous frame timestamp and derives the frame delta.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameClock {
    previous: Duration,
}

impl FrameClock {
    /// Starts at the clock epoch, so the first delta covers everything since
    /// process start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts at `now`, so the first delta only covers time after this point.
    pub fn starting_at(now: Duration) -> Self {
        Self { previous: now }
    }

    pub fn previous(&self) -> Duration {
        self.previous
    }

    /// Records `now` and returns the milliseconds since the last call. Never negative.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let delta = now.saturating_sub(self.previous);
        self.previous = self.previous.max(now);
        (delta.as_nanos() as f64 / 1_000_000.0) as f32
    }
}
