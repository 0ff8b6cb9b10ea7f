//! Monotonic clocks, fixed-rate deadlines and simulation time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source driving the scheduler.
pub trait Clock {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;
    /// Block until `deadline` (measured from the origin) has passed.
    fn sleep_until(&self, deadline: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Simulated clock for tests and headless runs. Sleeping jumps straight to
/// the deadline. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
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

    fn sleep_until(&self, deadline: Duration) {
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }
}

/// Deadline sequence for one fixed rate.
///
/// Deadline `n` is `n / hz` seconds after the origin, computed in whole
/// nanoseconds from the count so it never accumulates rounding and never
/// snaps to the current time. A host stall leaves the deadline behind and
/// the caller catches up one period per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRate {
    hz: u32,
    count: u64,
}

impl FixedRate {
    /// # Panics
    ///
    /// Panics on a zero rate; validate the config first.
    pub fn new(hz: u32) -> Self {
        assert!(hz > 0, "fixed rate must be positive");
        Self { hz, count: 0 }
    }

    pub fn hz(&self) -> u32 {
        self.hz
    }

    pub fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.hz))
    }

    /// Number of periods consumed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn deadline(&self) -> Duration {
        let nanos = u128::from(self.count) * 1_000_000_000 / u128::from(self.hz);
        Duration::from_nanos(nanos as u64)
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.deadline()
    }

    /// Move to the next deadline, exactly one period on.
    pub fn advance(&mut self) {
        self.count += 1;
    }

    /// Whole periods the deadline lags behind `now`.
    pub fn lag(&self, now: Duration) -> u64 {
        if now < self.deadline() {
            return 0;
        }
        let due = now.as_nanos() * u128::from(self.hz) / 1_000_000_000;
        (due as u64 + 1).saturating_sub(self.count)
    }
}

/// Simulation time as seen by game states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    /// Ticks run so far.
    pub ticks: u64,
    /// Frames drawn so far.
    pub frames: u64,
    pub tick_rate: u32,
}

impl WorldTime {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            ticks: 0,
            frames: 0,
            tick_rate,
        }
    }

    /// Fixed step length in seconds.
    pub fn delta(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f32 {
        (self.ticks as f64 / f64::from(self.tick_rate)) as f32
    }
}
