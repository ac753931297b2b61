//! `Elevator::step` — one fixed advance of doors and motion.
//!
//! # Step order
//!
//! ```text
//! ① doors    : progress toward open/closed at a health-scaled speed
//! ② emergency: motion frozen, nothing else happens
//! ③ interlock: any open door zeroes motion; auto-close timer runs
//! ④ promote  : no target: take the nearest queued floor
//! ⑤ idle     : still no target: damp residual velocity to rest
//! ⑥ drive    : brake or accelerate toward the target, integrate, detect arrival
//! ```

use log::{debug, trace};

use lift_core::SimTime;

use crate::{
    CabinEvent, Elevator, MotionState, ARRIVAL_DISTANCE, ARRIVAL_SPEED, BRAKE_MARGIN,
    DOOR_CYCLE_RESET, DOOR_OPEN_THRESHOLD, IDLE_DAMPING, IDLE_EPSILON, SPEED_GAIN,
};

impl Elevator {
    /// Advance the cabin by `dt` seconds ending at simulated time `now`.
    pub fn step(&mut self, dt: f64, now: SimTime) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        self.advance_doors(dt);

        if self.state == MotionState::Emergency {
            self.velocity = 0.0;
            self.acceleration = 0.0;
            return;
        }

        if self.doors_open || self.door_progress > 0.0 {
            self.velocity = 0.0;
            self.acceleration = 0.0;
            self.state = if self.doors_open && self.door_progress > DOOR_OPEN_THRESHOLD {
                MotionState::DoorOpen
            } else {
                MotionState::Door
            };
            if self.doors_open {
                self.run_auto_close(now);
            }
            return;
        }

        if self.target_floor.is_none() {
            if let Some(next) = self.pop_nearest() {
                trace!("promoting queued floor {next}");
                self.target_floor = Some(next);
                self.arrival_floor = None;
            }
        }

        match self.target_floor {
            None => self.damp_to_rest(dt),
            Some(target) => self.drive_toward(target, dt, now),
        }
    }

    /// Door speed scales with door health: 0.5× when broken, 1.3× when new.
    fn advance_doors(&mut self, dt: f64) {
        let factor = 0.5 + 0.8 * self.components.door / 100.0;
        let delta = self.cfg.door_speed * factor * dt;
        if self.doors_open {
            self.door_progress = (self.door_progress + delta).min(1.0);
        } else {
            self.door_progress = (self.door_progress - delta).max(0.0);
            if self.door_progress <= DOOR_CYCLE_RESET {
                self.cycle.board_handled = false;
                self.cycle.exit_handled = false;
            }
        }
    }

    /// Remove and return the queued floor closest to the cabin.  Exact ties
    /// go to the earliest-queued floor.
    fn pop_nearest(&mut self) -> Option<u32> {
        let here = self.current_floor();
        let (idx, _) = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|&(_, floor)| floor.abs_diff(here))?;
        Some(self.queue.remove(idx))
    }

    fn damp_to_rest(&mut self, dt: f64) {
        let before = self.velocity;
        self.velocity *= (1.0 - IDLE_DAMPING * dt).max(0.0);
        if self.velocity.abs() < IDLE_EPSILON {
            self.velocity = 0.0;
        }
        self.acceleration = (self.velocity - before) / dt;
        self.integrate_position(dt);
        if self.velocity == 0.0 {
            self.acceleration = 0.0;
            self.state = MotionState::Idle;
        } else {
            self.state = MotionState::Moving;
        }
    }

    /// Speed controller: brake at the limit once inside the braking
    /// distance, otherwise chase the speed profile
    /// `min(max_speed, sqrt(2·brake·remaining))` with a proportional gain.
    fn drive_toward(&mut self, target: u32, dt: f64, now: SimTime) {
        let target_y = self.cfg.floor_position(target);
        let distance = target_y - self.position_m;
        let remaining = distance.abs();
        let dir = if distance >= 0.0 { 1.0 } else { -1.0 };
        let brake = self.cfg.brake_limit;

        let closing_speed = self.velocity * dir;
        let braking_distance = self.velocity * self.velocity / (2.0 * brake);

        self.acceleration = if closing_speed > 0.0 && remaining <= braking_distance + BRAKE_MARGIN {
            // Never reverse direction within a single braking step.
            -self.velocity.signum() * brake.min(self.velocity.abs() / dt)
        } else {
            let desired = dir * self.cfg.max_speed.min((2.0 * brake * remaining).sqrt());
            self.bound_accel(SPEED_GAIN * (desired - self.velocity))
        };

        let max = self.cfg.max_speed;
        self.velocity = (self.velocity + self.acceleration * dt).clamp(-max, max);
        self.integrate_position(dt);
        self.state = MotionState::Moving;

        let remaining = (target_y - self.position_m).abs();
        if remaining < ARRIVAL_DISTANCE && self.velocity.abs() < ARRIVAL_SPEED {
            self.arrive(target, now);
        }
    }

    /// Speeding up is bounded by `accel_limit`, slowing down by `brake_limit`.
    fn bound_accel(&self, raw: f64) -> f64 {
        let speeding_up = self.velocity == 0.0 || raw.signum() == self.velocity.signum();
        let cap = if speeding_up { self.cfg.accel_limit } else { self.cfg.brake_limit };
        raw.clamp(-cap, cap)
    }

    fn integrate_position(&mut self, dt: f64) {
        let top = self.cfg.floor_position(self.cfg.top_floor());
        self.position_m = (self.position_m + self.velocity * dt).clamp(0.0, top);
    }

    fn arrive(&mut self, floor: u32, now: SimTime) {
        self.position_m = self.cfg.floor_position(floor);
        self.velocity = 0.0;
        self.acceleration = 0.0;
        self.arrival_floor = Some(floor);
        self.target_floor = None;
        self.state = MotionState::Arrived;
        self.events.push(CabinEvent::Arrived { floor });
        if let Err(refusal) = self.open_doors(now) {
            debug!("doors stayed shut on arrival at floor {floor}: {refusal}");
        }
    }
}
