//! `lift-cabin` — the elevator cabin entity.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`elevator`] | `Elevator`: commands, queries, request queue                |
//! | [`motion`]   | `Elevator::step`: door progression, speed controller, arrival |
//! | [`state`]    | `MotionState`, `DoorCycle`, `CabinEvent`                    |
//! | [`snapshot`] | `ElevatorSnapshot` and sanitising restore                   |
//! | [`error`]    | `Refusal`, `CommandResult<T>`                               |
//!
//! # Door / motion interlock
//!
//! The cabin may only move while `door_progress == 0` and the doors are
//! commanded closed.  Any open or half-open door forces velocity and
//! acceleration to zero on the next step.  Commands never panic: a refused
//! command returns a [`Refusal`] describing why, and leaves state untouched.

pub mod elevator;
pub mod error;
pub mod motion;
pub mod snapshot;
pub mod state;


pub use elevator::Elevator;
pub use error::{CommandResult, Refusal};
pub use snapshot::ElevatorSnapshot;
pub use state::{CabinEvent, DoorCycle, MotionState};

// ── Tuning constants ──────────────────────────────────────────────────────────

/// Doors below this health percentage refuse to move.
pub const MIN_DOOR_HEALTH: f64 = 5.0;

/// Door progress above which open doors count as "open" for the state machine.
pub const DOOR_OPEN_THRESHOLD: f64 = 0.05;

/// Door progress required before anyone can step in or out.
pub const DOOR_PASSABLE: f64 = 0.9;

/// Closing doors at or below this progress end the door-open cycle.
pub const DOOR_CYCLE_RESET: f64 = 0.02;

/// Arrival window: distance to the floor coordinate, metres.
pub const ARRIVAL_DISTANCE: f64 = 0.03;

/// Arrival window: residual speed, m/s.
pub const ARRIVAL_SPEED: f64 = 0.06;

/// Extra distance added to the braking distance before braking starts.
pub const BRAKE_MARGIN: f64 = 0.03;

/// Proportional gain of the speed controller.
pub const SPEED_GAIN: f64 = 1.8;

/// Velocity decay rate applied while the cabin has no target, 1/s.
pub const IDLE_DAMPING: f64 = 4.0;

/// Speeds below this snap to zero when idle.
pub const IDLE_EPSILON: f64 = 0.01;
