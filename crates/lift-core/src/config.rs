//! Simulation configuration.
//!
//! `SimConfig` is assembled once at startup (defaults, optionally overlaid by
//! a JSON file in the application crate), validated, and then passed by
//! reference into the elevator and world constructors.  Nothing mutates it
//! afterwards.

use crate::{LiftError, LiftResult};

// ── Policies ──────────────────────────────────────────────────────────────────

/// When open doors close on their own.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AutoClosePolicy {
    /// Close `auto_close_ms` after opening, whoever is inside.
    #[default]
    Unconditional,
    /// Close after `auto_close_ms` only while the tracked passenger is not
    /// inside; otherwise keep re-arming the timer.
    WhenVacant,
}

/// How the tracked passenger gets in and out of the cabin.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoardingMode {
    /// Boarding and exiting are explicit user commands.
    #[default]
    Manual,
    /// The world boards the passenger when the cabin opens at their floor and
    /// lets them out at their selected destination, after a short delay.
    Auto,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of floors served.  Floors are numbered `0..floors`.
    pub floors: u32,

    /// Floor the cabin is parked at when a fresh world is built.
    pub initial_floor: u32,

    /// Metres between consecutive floors.
    pub floor_height_m: f64,

    /// Top cabin speed in m/s.
    pub max_speed: f64,

    /// Acceleration bound while speeding up, m/s².
    pub accel_limit: f64,

    /// Deceleration bound while slowing down, m/s².  Also used for braking
    /// distance planning.
    pub brake_limit: f64,

    /// Door progress per second before the door-health speed factor.
    pub door_speed: f64,

    /// Weight the tracked passenger adds to the cabin.
    pub passenger_weight_kg: f64,

    /// Maximum cabin load.
    pub overload_limit_kg: f64,

    /// Minimum time between two enter/exit actions.
    pub door_cooldown_ms: u64,

    /// Delay before open doors close on their own.
    pub auto_close_ms: u64,

    pub auto_close: AutoClosePolicy,

    pub boarding: BoardingMode,

    /// Number of simulated third-party traffic sources.
    pub npc_count: u16,

    /// Multiplier on NPC call frequency and cargo churn.  0 disables both.
    pub npc_traffic: f64,

    /// Expected random mechanical events per simulated second.
    pub event_rate_per_sec: f64,

    /// Size of one fixed simulation step.
    pub tick_ms: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floors:              10,
            initial_floor:       0,
            floor_height_m:      3.0,
            max_speed:           2.5,
            accel_limit:         1.2,
            brake_limit:         1.5,
            door_speed:          0.8,
            passenger_weight_kg: 80.0,
            overload_limit_kg:   1_800.0,
            door_cooldown_ms:    1_200,
            auto_close_ms:       6_000,
            auto_close:          AutoClosePolicy::Unconditional,
            boarding:            BoardingMode::Manual,
            npc_count:           3,
            npc_traffic:         1.0,
            event_rate_per_sec:  0.002,
            tick_ms:             50,
            seed:                42,
        }
    }
}

impl SimConfig {
    /// Check every field for a usable value.
    pub fn validate(&self) -> LiftResult<()> {
        let positive = [
            ("floor_height_m", self.floor_height_m),
            ("max_speed", self.max_speed),
            ("accel_limit", self.accel_limit),
            ("brake_limit", self.brake_limit),
            ("door_speed", self.door_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LiftError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("passenger_weight_kg", self.passenger_weight_kg),
            ("npc_traffic", self.npc_traffic),
            ("event_rate_per_sec", self.event_rate_per_sec),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LiftError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }
        if self.floors < 2 {
            return Err(LiftError::Config(format!("need at least 2 floors, got {}", self.floors)));
        }
        if self.initial_floor >= self.floors {
            return Err(LiftError::InvalidFloor { floor: self.initial_floor, floors: self.floors });
        }
        if !(self.overload_limit_kg.is_finite() && self.overload_limit_kg >= self.passenger_weight_kg) {
            return Err(LiftError::Config(format!(
                "overload_limit_kg {} is below passenger_weight_kg {}",
                self.overload_limit_kg, self.passenger_weight_kg
            )));
        }
        if self.tick_ms == 0 {
            return Err(LiftError::Config("tick_ms must be non-zero".into()));
        }
        Ok(())
    }

    /// Index of the top floor.
    #[inline]
    pub fn top_floor(&self) -> u32 {
        self.floors - 1
    }

    /// Clamp an arbitrary floor request into `0..floors`.
    #[inline]
    pub fn clamp_floor(&self, floor: i64) -> u32 {
        floor.clamp(0, self.top_floor() as i64) as u32
    }

    /// Shaft coordinate of `floor`, in metres above ground.
    #[inline]
    pub fn floor_position(&self, floor: u32) -> f64 {
        floor as f64 * self.floor_height_m
    }

    /// One fixed step expressed in seconds.
    #[inline]
    pub fn tick_secs(&self) -> f64 {
        self.tick_ms as f64 / 1_000.0
    }
}
