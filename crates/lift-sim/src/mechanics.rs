//! Scheduled-event handlers: random jams, repairs and the delayed
//! automatic board/exit continuations.

use log::{debug, info};

use lift_core::{Component, SimTime};
use lift_schedule::{EventKind, JAM_DELAY_MS, REPAIR_DELAY_MS};

use crate::{Notification, World};

/// Health points a jam removes.
pub const JAM_DAMAGE: std::ops::RangeInclusive<f64> = 6.0..=18.0;

/// Health points a repair restores.
pub const REPAIR_AMOUNT: std::ops::RangeInclusive<f64> = 12.0..=40.0;

impl World {
    /// Roll the rate-limited trigger; on success queue a door jam a short,
    /// random while ahead.
    pub(crate) fn roll_mechanical_event(&mut self, dt: f64, now: SimTime) {
        let rate = self.config.event_rate_per_sec;
        if !self.trigger.should_trigger(rate, dt, now, &mut self.rng) {
            return;
        }
        let at = now + self.rng.gen_range(JAM_DELAY_MS);
        debug!("mechanical event triggered; door jam due at {at}");
        self.events.push(at, EventKind::DoorJam(Component::Door));
    }

    pub(crate) fn apply_event(&mut self, kind: EventKind, now: SimTime) {
        match kind {
            EventKind::DoorJam(component) => {
                let forced_open = self.rng.gen_bool(0.5);
                self.jam_doors(component, forced_open);
            }
            EventKind::AutoRepair(component) => self.repair(component),
            EventKind::AutoBoard { floor } => self.auto_board(floor, now),
            EventKind::AutoExit { floor } => self.auto_exit(floor, now),
        }
    }

    /// Apply a door jam now: damage `component`, slam the doors fully open
    /// or shut and hold them, and schedule the compensating repair.
    pub fn jam_doors(&mut self, component: Component, forced_open: bool) {
        let now = self.clock.now;
        let damage = self.rng.gen_range(JAM_DAMAGE);
        let health = self.elevator.adjust_health(component, -damage);
        self.elevator.force_doors(forced_open, now);

        let repair_at = now + self.rng.gen_range(REPAIR_DELAY_MS);
        self.events.push(repair_at, EventKind::AutoRepair(component));

        info!(
            "{component} jammed {} (-{damage:.1}, now {health:.1}%); repair due at {repair_at}",
            if forced_open { "open" } else { "shut" }
        );
        self.emit(Notification::DoorJammed { component, forced_open, health });
        self.flush_cabin_events();
    }

    fn repair(&mut self, component: Component) {
        let amount = self.rng.gen_range(REPAIR_AMOUNT);
        let health = self.elevator.adjust_health(component, amount);
        self.elevator.release_door_hold(self.clock.now);
        info!("{component} repaired (+{amount:.1}, now {health:.1}%)");
        self.emit(Notification::Repaired { component, health });
    }

    /// Commit a scheduled boarding if it still makes sense; otherwise let a
    /// later door cycle try again.
    fn auto_board(&mut self, floor: u32, now: SimTime) {
        let still_valid = !self.passenger.inside
            && self.passenger.floor == floor
            && self.elevator.doors_open()
            && self.elevator.is_at_floor(floor);
        if still_valid {
            match self.board() {
                Ok(()) => {
                    self.elevator.cycle_mut().exit_handled = true;
                    return;
                }
                Err(e) => debug!("auto-board at floor {floor} failed at {now}: {e}"),
            }
        } else {
            debug!("auto-board at floor {floor} no longer applies");
        }
        // Retry on a later opening, never twice in one cycle.
        if !self.elevator.doors_open() {
            self.elevator.cycle_mut().board_handled = false;
        }
    }

    fn auto_exit(&mut self, floor: u32, now: SimTime) {
        let still_valid = self.passenger.inside
            && self.passenger.destination == Some(floor)
            && self.elevator.doors_open()
            && self.elevator.is_at_floor(floor);
        if still_valid {
            match self.alight() {
                // One automatic action per door cycle.
                Ok(()) => {
                    self.elevator.cycle_mut().board_handled = true;
                    return;
                }
                Err(e) => debug!("auto-exit at floor {floor} failed at {now}: {e}"),
            }
        } else {
            debug!("auto-exit at floor {floor} no longer applies");
        }
        // Retry on a later opening, never twice in one cycle.
        if !self.elevator.doors_open() {
            self.elevator.cycle_mut().exit_handled = false;
        }
    }
}
