//! Cabin state machine types.

use lift_core::SimTime;

/// Coarse cabin state, re-derived every step.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotionState {
    /// Stationary with no target and doors closed.
    #[default]
    Idle,
    /// Travelling toward `target_floor`, or coasting to rest.
    Moving,
    /// Reached the target this step.  Lasts a single step.
    Arrived,
    /// Doors open beyond [`DOOR_OPEN_THRESHOLD`][crate::DOOR_OPEN_THRESHOLD].
    DoorOpen,
    /// Doors moving, or barely open.
    Door,
    /// Motion frozen until acknowledged.
    Emergency,
}

/// Bookkeeping for one door-open cycle: from the doors starting to open until
/// they are next fully closed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DoorCycle {
    /// When the doors were last commanded open.
    pub opened_at: Option<SimTime>,
    /// An automatic boarding was already attempted this cycle.
    pub board_handled: bool,
    /// An automatic exit was already attempted this cycle.
    pub exit_handled: bool,
}

/// Things the cabin reports to its owner.  Collected during commands and
/// `step`, then drained by the world with [`Elevator::drain_events`][crate::Elevator::drain_events].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CabinEvent {
    DoorsOpened,
    DoorsClosed,
    Arrived { floor: u32 },
}
