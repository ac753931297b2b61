//! Scheduled event kinds.

use std::fmt;

use lift_core::{Component, SimTime};

/// What happens when a queued entry fires.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    /// Degrade `component` and force the doors into a random held state.
    DoorJam(Component),
    /// Restore some of `component`'s health and lift any door hold.
    AutoRepair(Component),
    /// Board the tracked passenger at `floor` if still possible.
    AutoBoard { floor: u32 },
    /// Let the tracked passenger out at `floor` if still possible.
    AutoExit { floor: u32 },
}

impl EventKind {
    /// `true` for jams and repairs, `false` for boarding continuations.
    pub fn is_mechanical(&self) -> bool {
        matches!(self, EventKind::DoorJam(_) | EventKind::AutoRepair(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::DoorJam(c)          => write!(f, "door_jam({c})"),
            EventKind::AutoRepair(c)       => write!(f, "auto_repair({c})"),
            EventKind::AutoBoard { floor } => write!(f, "auto_board({floor})"),
            EventKind::AutoExit { floor }  => write!(f, "auto_exit({floor})"),
        }
    }
}

/// A queued event together with its fire time.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledEvent {
    pub fire_at: SimTime,
    pub kind:    EventKind,
}
