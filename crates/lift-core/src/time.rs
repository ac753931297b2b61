//! Simulated time model.
//!
//! # Design
//!
//! Two clocks run side by side:
//!
//! - `Tick` counts fixed simulation steps taken by the world.
//! - `SimTime` is the simulated elapsed time in milliseconds.  Every
//!   timestamp held in domain state (cooldowns, debounce windows, scheduled
//!   event fire times) is a `SimTime`.
//!
//! Nothing in the simulation reads the wall clock.  `SimClock` is the only
//! time source and is owned by the world, so a run replays identically from
//! the same seed and command sequence.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Simulated elapsed time since the world was created, in milliseconds.
///
/// `u64` milliseconds last ~584 million years, so arithmetic never needs to
/// worry about overflow in practice; subtraction saturates at zero instead.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Construct from whole seconds.
    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * 1_000)
    }

    /// Milliseconds elapsed from `earlier` to `self`, or 0 if `earlier` is
    /// in the future.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs_ms: u64) -> SimTime {
        SimTime(self.0 + rhs_ms)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0 / 1_000;
        write!(f, "{:02}:{:02}:{:02}.{:03}", total / 3_600, (total % 3_600) / 60, total % 60, self.0 % 1_000)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The world's time source: a step counter plus the simulated time it maps to.
///
/// Steps are usually the configured fixed tick, but fast-forward replays use
/// coarser steps, so `now` is accumulated rather than derived from `tick`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Steps taken so far.
    pub tick: Tick,
    /// Simulated time reached so far.
    pub now: SimTime,
}

impl SimClock {
    /// A clock resumed at `now` (tick count restarts from `tick`).
    pub fn resume(tick: Tick, now: SimTime) -> Self {
        Self { tick, now }
    }

    /// Advance by one step of `step_ms` milliseconds.
    #[inline]
    pub fn advance(&mut self, step_ms: u64) {
        self.tick = self.tick.offset(1);
        self.now = self.now + step_ms;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tick, self.now)
    }
}
