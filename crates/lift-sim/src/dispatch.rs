//! Boarding/exit gating and call dispatch, run after the cabin has stepped.

use log::debug;

use lift_cabin::{MotionState, Refusal};
use lift_core::{BoardingMode, SimTime};
use lift_schedule::{EventKind, AUTO_ACTION_DELAY_MS};

use crate::{Notification, World};

/// Door progress at which an open door counts as settled for serving calls
/// and automatic boarding.
pub const DOOR_SETTLED: f64 = 0.98;

/// Cargo churn events per second at traffic factor 1.
pub const CARGO_CHURN_RATE: f64 = 0.05;

/// Size of one churned cargo item, kg.
pub const CARGO_ITEM_KG: std::ops::RangeInclusive<f64> = 40.0..=90.0;

impl World {
    pub(crate) fn step_boarding(&mut self, dt: f64, now: SimTime) {
        if !(self.elevator.doors_open() && self.elevator.door_progress() >= DOOR_SETTLED) {
            return;
        }
        let floor = self.elevator.current_floor();
        if self.elevator.is_at_floor(floor) {
            for id in self.calls.serve_floor(floor, now) {
                self.emit(Notification::CallServed { id, floor });
            }
        }

        if !self.elevator.cooldown_ready(now) {
            return;
        }
        self.churn_cargo(dt);
        if self.config.boarding == BoardingMode::Auto {
            self.schedule_auto_actions(floor, now);
        }
    }

    /// NPCs occasionally load or unload cargo while the doors are open.
    fn churn_cargo(&mut self, dt: f64) {
        let traffic = self.config.npc_traffic;
        if self.config.npc_count == 0 || !(traffic > 0.0) {
            return;
        }
        if !self.rng.gen_bool(CARGO_CHURN_RATE * traffic * dt) {
            return;
        }
        let kg = self.rng.gen_range(CARGO_ITEM_KG);
        let delta = if self.rng.gen_bool(0.5) { kg } else { -kg };
        match self.elevator.adjust_cargo(delta) {
            Ok(applied) => debug!("npc cargo {applied:+.0} kg, load {:.0} kg", self.elevator.load_kg()),
            Err(refusal) => debug!("npc cargo refused: {refusal}"),
        }
    }

    /// Once per door cycle, queue the delayed board or exit that applies.
    fn schedule_auto_actions(&mut self, floor: u32, now: SimTime) {
        if !self.elevator.is_at_floor(floor) {
            return;
        }
        let at = now + AUTO_ACTION_DELAY_MS;
        let (board_handled, exit_handled) = {
            let cycle = self.elevator.cycle();
            (cycle.board_handled, cycle.exit_handled)
        };

        if !self.passenger.inside && !board_handled && self.passenger.floor == floor {
            self.elevator.cycle_mut().board_handled = true;
            self.events.push(at, EventKind::AutoBoard { floor });
        } else if self.passenger.inside
            && !exit_handled
            && self.passenger.destination == Some(floor)
            && self.elevator.arrival_floor() == Some(floor)
        {
            self.elevator.cycle_mut().exit_handled = true;
            self.events.push(at, EventKind::AutoExit { floor });
        }
    }

    /// Return assignments the cabin no longer plans to serve to the pending
    /// pool, then bind the nearest pending call when the cabin has no target.
    pub(crate) fn dispatch(&mut self, now: SimTime) {
        let cabin = &self.elevator;
        self.calls.requeue_orphans(|f| cabin.plans_to_serve(f));

        if self.elevator.target_floor().is_some() || self.elevator.state() == MotionState::Emergency {
            return;
        }
        let Some((idx, floor)) = self.calls.nearest_pending(self.elevator.current_floor()) else {
            return;
        };
        // Already standing there: reopen in place. Doors that cannot open
        // leave the call pending until they can.
        let result = if self.elevator.is_at_floor(floor) && !self.elevator.doors_open() {
            let opened = self.elevator.open_doors(now);
            self.flush_cabin_events();
            opened
        } else {
            self.elevator.request_external(floor, now)
        };
        match result {
            Ok(()) | Err(Refusal::AlreadyRequested { .. }) => {
                let live = self.calls.live_count();
                let call = self.calls.assign(idx, now);
                debug!("{} assigned: floor {} {} ({live} live)", call.id, call.floor, call.direction);
            }
            Err(refusal) => debug!("dispatch to floor {floor} refused: {refusal}"),
        }
    }
}
