//! Plain-data copy of the cabin's state for persistence.
//!
//! `ElevatorSnapshot` is deliberately a flat struct of public fields so the
//! persistence layer can overlay whatever fields survive in a saved file onto
//! a default snapshot.  [`Elevator::restore`] then sanitises the result, so a
//! damaged snapshot still yields a cabin that satisfies every invariant.

use lift_core::{ComponentHealth, SimConfig, SimTime};

use crate::{DoorCycle, Elevator, MotionState};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElevatorSnapshot {
    pub position_m:         f64,
    pub velocity:           f64,
    pub acceleration:       f64,
    pub target_floor:       Option<u32>,
    pub queue:              Vec<u32>,
    pub arrival_floor:      Option<u32>,
    pub state:              MotionState,
    pub doors_open:         bool,
    pub door_progress:      f64,
    pub door_hold:          Option<bool>,
    pub auto_close_at:      Option<SimTime>,
    pub cycle:              DoorCycle,
    pub load_kg:            f64,
    pub occupant_present:   bool,
    pub occupant_weight_kg: f64,
    pub last_door_action:   Option<SimTime>,
    pub components:         ComponentHealth,
}

impl Default for ElevatorSnapshot {
    /// The state of a fresh cabin parked at the ground floor.
    fn default() -> Self {
        Elevator::new(&SimConfig::default()).snapshot()
    }
}

impl Elevator {
    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            position_m:         self.position_m,
            velocity:           self.velocity,
            acceleration:       self.acceleration,
            target_floor:       self.target_floor,
            queue:              self.queue.clone(),
            arrival_floor:      self.arrival_floor,
            state:              self.state,
            doors_open:         self.doors_open,
            door_progress:      self.door_progress,
            door_hold:          self.door_hold,
            auto_close_at:      self.auto_close_at,
            cycle:              self.cycle.clone(),
            load_kg:            self.load_kg,
            occupant_present:   self.occupant_present,
            occupant_weight_kg: self.occupant_weight_kg,
            last_door_action:   self.last_door_action,
            components:         self.components.clone(),
        }
    }

    /// Rebuild a cabin from `snap`, repairing anything out of range.
    pub fn restore(cfg: &SimConfig, snap: ElevatorSnapshot) -> Self {
        let mut cabin = Elevator::new(cfg);
        let top_y = cfg.floor_position(cfg.top_floor());
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let in_range = |f: &u32| *f < cfg.floors;

        cabin.position_m = finite_or(snap.position_m, cabin.position_m).clamp(0.0, top_y);
        cabin.velocity = finite_or(snap.velocity, 0.0).clamp(-cfg.max_speed, cfg.max_speed);
        cabin.acceleration = finite_or(snap.acceleration, 0.0);

        cabin.target_floor = snap.target_floor.filter(in_range);
        let mut queue: Vec<u32> = Vec::with_capacity(snap.queue.len());
        for floor in snap.queue.into_iter().filter(in_range) {
            if !queue.contains(&floor) && cabin.target_floor != Some(floor) {
                queue.push(floor);
            }
        }
        cabin.queue = queue;
        cabin.arrival_floor = snap.arrival_floor.filter(in_range);

        cabin.doors_open = snap.doors_open;
        cabin.door_progress = finite_or(snap.door_progress, 0.0).clamp(0.0, 1.0);
        cabin.door_hold = snap.door_hold;
        cabin.auto_close_at = snap.auto_close_at.filter(|_| snap.doors_open);
        cabin.cycle = snap.cycle;
        if cabin.doors_open || cabin.door_progress > 0.0 {
            cabin.velocity = 0.0;
            cabin.acceleration = 0.0;
        }
        if cabin.doors_open {
            cabin.park_target();
        }

        cabin.components = snap.components.sanitized();
        cabin.occupant_present = snap.occupant_present;
        cabin.occupant_weight_kg = if snap.occupant_present {
            finite_or(snap.occupant_weight_kg, cfg.passenger_weight_kg).max(0.0)
        } else {
            0.0
        };
        cabin.load_kg = finite_or(snap.load_kg, 0.0).max(cabin.occupant_weight_kg);
        cabin.last_door_action = snap.last_door_action;

        // Arrived is a single-step state; anything else is re-derived on the
        // next step, except an emergency which must be acknowledged.
        cabin.state = match snap.state {
            MotionState::Emergency => {
                cabin.velocity = 0.0;
                cabin.acceleration = 0.0;
                MotionState::Emergency
            }
            MotionState::Arrived => MotionState::Idle,
            other => other,
        };
        cabin
    }
}
