//! `lift-schedule` — everything in the simulation that happens "later".
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`event`]    | `EventKind`, `ScheduledEvent`                              |
//! | [`queue`]    | `EventQueue` (`BTreeMap<SimTime, Vec<EventKind>>`)         |
//! | [`trigger`]  | `EventTrigger`: rate-limited Bernoulli trigger             |
//! | [`npc`]      | `NpcTimer`, `NpcTraffic`, `CallIntent`                     |
//!
//! # One clock, one queue
//!
//! Mechanical events (door jams, repairs) and the short delayed continuations
//! of automatic boarding share the same `EventQueue`, keyed by `SimTime`.
//! The world drains every due entry once per tick:
//!
//! ```text
//! due = queue.drain_due(now)      // ascending fire time, FIFO within a time
//! for ev in due { world.apply(ev) }
//! ```
//!
//! Continuations carry no closures: each `EventKind` names the action and the
//! world re-checks its preconditions when the entry fires.

pub mod event;
pub mod npc;
pub mod queue;
pub mod trigger;

#[cfg(test)]
mod tests;

pub use event::{EventKind, ScheduledEvent};
pub use npc::{CallIntent, NpcTimer, NpcTraffic};
pub use queue::EventQueue;
pub use trigger::{EventTrigger, TRIGGER_WINDOW_MS, MAX_TRIGGERS_PER_WINDOW};

// ── Delay bounds (milliseconds) ───────────────────────────────────────────────

/// Delay between a trigger and the door jam it schedules.
pub const JAM_DELAY_MS: std::ops::RangeInclusive<u64> = 2_000..=40_000;

/// Delay between a door jam (or alarm) and its compensating repair.
pub const REPAIR_DELAY_MS: std::ops::RangeInclusive<u64> = 12_000..=40_000;

/// Delay before an automatic board or exit is committed.
pub const AUTO_ACTION_DELAY_MS: u64 = 700;
