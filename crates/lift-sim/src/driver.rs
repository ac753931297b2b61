//! Driving a world from outside: frame-paced fixed steps and fast-forward.
//!
//! # Fixed-step frames
//!
//! A presentation loop reports real elapsed time per frame.  The driver
//! accumulates it and runs whole fixed steps, at most
//! [`MAX_CATCH_UP_STEPS`] per frame.  Whatever is still owed after the cap is
//! dropped, so a stalled frame never snowballs into a long catch-up.
//!
//! # Fast-forward
//!
//! After reloading a saved world, [`World::fast_forward`] replays the time
//! that passed while it was not running: 5 s chunks of 250 ms sub-steps, up
//! to a 10 minute horizon.  The coarse sub-step keeps this cheap; the result
//! is plausible rather than identical to a real-time run.

use log::{debug, info};

use crate::World;

/// Most fixed steps run for a single frame.
pub const MAX_CATCH_UP_STEPS: u32 = 8;

/// Fast-forward chunk length.
pub const FAST_FORWARD_CHUNK_MS: u64 = 5_000;

/// Fast-forward step length.
pub const FAST_FORWARD_STEP_MS: u64 = 250;

/// Longest span fast-forward will replay.
pub const FAST_FORWARD_HORIZON_MS: u64 = 10 * 60 * 1_000;

/// What one call to [`FixedStepDriver::frame`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct FrameReport {
    /// Fixed steps run this frame.
    pub steps:      u32,
    /// Time discarded because the catch-up cap was hit.
    pub dropped_ms: u64,
}

/// Accumulator that turns variable frame times into fixed world steps.
#[derive(Clone, Debug)]
pub struct FixedStepDriver {
    step_ms:        u64,
    accumulator_ms: u64,
}

impl FixedStepDriver {
    /// A driver stepping `world` at its configured tick.
    pub fn new(world: &World) -> Self {
        Self { step_ms: world.config().tick_ms.max(1), accumulator_ms: 0 }
    }

    /// Time carried over to the next frame.
    pub fn pending_ms(&self) -> u64 {
        self.accumulator_ms
    }

    /// Account for `elapsed_ms` of real time and step `world` accordingly.
    pub fn frame(&mut self, world: &mut World, elapsed_ms: u64) -> FrameReport {
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        let mut report = FrameReport::default();
        while self.accumulator_ms >= self.step_ms && report.steps < MAX_CATCH_UP_STEPS {
            world.step();
            self.accumulator_ms -= self.step_ms;
            report.steps += 1;
        }
        if self.accumulator_ms >= self.step_ms {
            // Keep the sub-step remainder, drop the whole steps still owed.
            let remainder = self.accumulator_ms % self.step_ms;
            report.dropped_ms = self.accumulator_ms - remainder;
            self.accumulator_ms = remainder;
            debug!("frame fell behind; dropped {} ms", report.dropped_ms);
        }
        report
    }
}

impl World {
    /// Replay `elapsed_ms` of simulated time in coarse steps, capped at
    /// [`FAST_FORWARD_HORIZON_MS`].  Returns the time actually replayed.
    pub fn fast_forward(&mut self, elapsed_ms: u64) -> u64 {
        let target = elapsed_ms.min(FAST_FORWARD_HORIZON_MS);
        let mut replayed = 0;
        while replayed < target {
            let chunk = FAST_FORWARD_CHUNK_MS.min(target - replayed);
            let mut done = 0;
            while done < chunk {
                let step = FAST_FORWARD_STEP_MS.min(chunk - done);
                self.advance(step);
                done += step;
            }
            replayed += chunk;
        }
        if replayed > 0 {
            info!("fast-forwarded {replayed} ms (asked for {elapsed_ms} ms); now {}", self.clock.now);
        }
        replayed
    }
}
