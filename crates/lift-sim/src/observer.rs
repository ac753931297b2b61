//! World observer trait and the notifications it receives.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use lift_cabin::MotionState;
use lift_core::{CallId, Component, Direction, SimTime, Tick};

use crate::Requester;

// ── Notification ──────────────────────────────────────────────────────────────

/// Something a presentation layer may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    CallSubmitted { id: CallId, floor: u32, direction: Direction, requester: Requester },
    CallServed { id: CallId, floor: u32 },
    DoorChanged { open: bool, floor: u32 },
    Arrived { floor: u32 },
    Boarded { floor: u32 },
    Exited { floor: u32 },
    AlarmRaised { floor: u32 },
    DoorJammed { component: Component, forced_open: bool, health: f64 },
    Repaired { component: Component, health: f64 },
    EmergencyChanged { active: bool },
}

impl Notification {
    /// Short machine-readable name, e.g. for CSV output.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::CallSubmitted { .. }    => "call_submitted",
            Notification::CallServed { .. }       => "call_served",
            Notification::DoorChanged { .. }      => "door_changed",
            Notification::Arrived { .. }          => "arrived",
            Notification::Boarded { .. }          => "boarded",
            Notification::Exited { .. }           => "exited",
            Notification::AlarmRaised { .. }      => "alarm_raised",
            Notification::DoorJammed { .. }       => "door_jammed",
            Notification::Repaired { .. }         => "repaired",
            Notification::EmergencyChanged { .. } => "emergency_changed",
        }
    }

    /// The floor the notification concerns, if any.
    pub fn floor(&self) -> Option<u32> {
        match *self {
            Notification::CallSubmitted { floor, .. }
            | Notification::CallServed { floor, .. }
            | Notification::DoorChanged { floor, .. }
            | Notification::Arrived { floor }
            | Notification::Boarded { floor }
            | Notification::Exited { floor }
            | Notification::AlarmRaised { floor } => Some(floor),
            Notification::DoorJammed { .. }
            | Notification::Repaired { .. }
            | Notification::EmergencyChanged { .. } => None,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::CallSubmitted { id, floor, direction, requester } => {
                write!(f, "{requester} called {direction} at floor {floor} ({id})")
            }
            Notification::CallServed { id, floor } => write!(f, "{id} served at floor {floor}"),
            Notification::DoorChanged { open: true, floor } => write!(f, "doors opening at floor {floor}"),
            Notification::DoorChanged { open: false, floor } => write!(f, "doors closing at floor {floor}"),
            Notification::Arrived { floor } => write!(f, "arrived at floor {floor}"),
            Notification::Boarded { floor } => write!(f, "passenger boarded at floor {floor}"),
            Notification::Exited { floor } => write!(f, "passenger exited at floor {floor}"),
            Notification::AlarmRaised { floor } => write!(f, "alarm raised at floor {floor}"),
            Notification::DoorJammed { component, forced_open, health } => write!(
                f,
                "{component} jammed {}, health {health:.1}%",
                if *forced_open { "open" } else { "shut" }
            ),
            Notification::Repaired { component, health } => {
                write!(f, "{component} repaired, health {health:.1}%")
            }
            Notification::EmergencyChanged { active: true } => f.write_str("emergency stop engaged"),
            Notification::EmergencyChanged { active: false } => f.write_str("emergency acknowledged"),
        }
    }
}

// ── TickSummary ───────────────────────────────────────────────────────────────

/// Read-only state digest handed to observers after every step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick:          Tick,
    pub at:            SimTime,
    pub floor:         u32,
    pub position_m:    f64,
    pub velocity:      f64,
    pub door_progress: f64,
    pub doors_open:    bool,
    pub load_kg:       f64,
    pub pending_calls: usize,
    pub state:         MotionState,
}

// ── Observer trait ────────────────────────────────────────────────────────────

/// Callbacks invoked by the [`World`][crate::World] as it runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: arrival printer
///
/// ```rust,ignore
/// struct ArrivalPrinter;
///
/// impl WorldObserver for ArrivalPrinter {
///     fn on_notification(&mut self, at: SimTime, n: &Notification) {
///         if let Notification::Arrived { floor } = n {
///             println!("{at}: floor {floor}");
///         }
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called for every notification, in the order they occur.
    fn on_notification(&mut self, _at: SimTime, _notification: &Notification) {}

    /// Called once at the end of each step.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}

/// Lets a caller keep a handle on an observer after handing it to the world.
impl<O: WorldObserver> WorldObserver for Rc<RefCell<O>> {
    fn on_notification(&mut self, at: SimTime, notification: &Notification) {
        self.borrow_mut().on_notification(at, notification);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.borrow_mut().on_tick_end(summary);
    }
}
