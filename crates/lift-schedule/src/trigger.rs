//! `EventTrigger` — rate-limited Bernoulli trigger for random mechanical events.
//!
//! Each tick the world asks whether an event should start.  The per-tick
//! probability is `1 - exp(-rate · dt)`, the exact Poisson probability of at
//! least one arrival in `dt` seconds, so the long-run rate does not depend on
//! the tick length.  On top of that, at most
//! [`MAX_TRIGGERS_PER_WINDOW`] triggers are allowed in any rolling
//! [`TRIGGER_WINDOW_MS`] window.

use std::collections::VecDeque;

use log::trace;

use lift_core::{SimRng, SimTime};

/// Length of the rolling rate-limit window.
pub const TRIGGER_WINDOW_MS: u64 = 60_000;

/// Maximum triggers inside one window.
pub const MAX_TRIGGERS_PER_WINDOW: usize = 5;

#[derive(Default, Clone, Debug)]
pub struct EventTrigger {
    /// Times of recent triggers, oldest first.
    recent: VecDeque<SimTime>,
}

impl EventTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll for one trigger covering `dt` seconds that end at `now`.
    ///
    /// Returns `false` without consuming randomness when the window is full
    /// or the rate is not positive.
    pub fn should_trigger(&mut self, rate_per_sec: f64, dt: f64, now: SimTime, rng: &mut SimRng) -> bool {
        while let Some(&oldest) = self.recent.front() {
            if now.since(oldest) >= TRIGGER_WINDOW_MS {
                self.recent.pop_front();
            } else {
                break;
            }
        }
        if self.recent.len() >= MAX_TRIGGERS_PER_WINDOW {
            trace!("event trigger saturated at {now}");
            return false;
        }
        if !(rate_per_sec > 0.0 && dt > 0.0) {
            return false;
        }
        let p = 1.0 - (-rate_per_sec * dt).exp();
        if rng.gen_bool(p) {
            self.recent.push_back(now);
            true
        } else {
            false
        }
    }

    /// Triggers counted in the current window.
    pub fn recent_count(&self) -> usize {
        self.recent.len()
    }
}
