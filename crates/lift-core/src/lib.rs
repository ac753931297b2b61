//! `lift-core` — foundational types for the lift simulation workspace.
//!
//! This crate is a dependency of every other `lift-*` crate.  It has no
//! `lift-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CallId`, `NpcId`                                     |
//! | [`time`]        | `SimTime`, `Tick`, `SimClock`                         |
//! | [`rng`]         | `NpcRng` (per-NPC), `SimRng` (global)                 |
//! | [`component`]   | `Component`, `ComponentHealth`                        |
//! | [`direction`]   | `Direction` (hall-call up/down)                       |
//! | [`config`]      | `SimConfig`, `AutoClosePolicy`, `BoardingMode`        |
//! | [`error`]       | `LiftError`, `LiftResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the world snapshot in `lift-sim`.              |

pub mod component;
pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use component::{Component, ComponentHealth};
pub use config::{AutoClosePolicy, BoardingMode, SimConfig};
pub use direction::Direction;
pub use error::{LiftError, LiftResult};
pub use ids::{CallId, NpcId};
pub use rng::{NpcRng, SimRng};
pub use time::{SimClock, SimTime, Tick};
