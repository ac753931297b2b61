//! `lift-sim` — the world that runs the lift simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`world`]     | `World`: commands, queries, the step pipeline             |
//! | [`call`]      | `Call`, `CallStatus`, `Requester`, `CallBook`             |
//! | [`dispatch`]  | boarding/exit gating and nearest-call dispatch            |
//! | [`mechanics`] | door jams, repairs, automatic board/exit continuations    |
//! | [`observer`]  | `WorldObserver`, `Notification`, `TickSummary`            |
//! | [`builder`]   | `WorldBuilder`                                            |
//! | [`snapshot`]  | `WorldSnapshot`, JSON save and lenient restore            |
//! | [`driver`]    | `FixedStepDriver`, `World::fast_forward`                  |
//! | [`error`]     | `SimError`, `SimResult<T>`, `CommandError`                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lift_core::{Direction, SimConfig};
//! use lift_sim::{FixedStepDriver, World};
//!
//! let mut world = World::new(&SimConfig::default())?;
//! world.call_elevator(Direction::Up)?;
//! let mut driver = FixedStepDriver::new(&world);
//! loop {
//!     let report = driver.frame(&mut world, frame_ms());
//!     render(world.summary());
//! }
//! ```

pub mod builder;
pub mod call;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod mechanics;
pub mod observer;
pub mod snapshot;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::WorldBuilder;
pub use call::{Call, CallBook, CallStatus, Requester, CALL_DEBOUNCE_MS, SERVED_RETENTION};
pub use driver::{FixedStepDriver, FrameReport, MAX_CATCH_UP_STEPS};
pub use error::{CommandError, SimError, SimResult};
pub use observer::{NoopObserver, Notification, TickSummary, WorldObserver};
pub use snapshot::{WorldSnapshot, SNAPSHOT_VERSION};
pub use world::{LogEntry, Passenger, World, LOG_TAIL};
