//! The `Elevator` entity: physical state, request queue and commands.

use log::debug;

use lift_core::{AutoClosePolicy, Component, ComponentHealth, SimConfig, SimTime};

use crate::{
    CabinEvent, CommandResult, DoorCycle, MotionState, Refusal, DOOR_PASSABLE, IDLE_EPSILON,
    MIN_DOOR_HEALTH,
};

/// A single cabin in a single shaft.
///
/// Position is measured in metres above the ground floor.  The cabin is
/// mutated only through the command methods below and [`step`][Self::step];
/// every command returns a [`CommandResult`] instead of panicking.
///
/// # Request path
///
/// `target_floor` is the floor currently being travelled to.  Further
/// requests wait in `queue` (distinct floors, insertion order).  When the
/// cabin has no target and its doors are shut, `step` promotes the queued
/// floor nearest to the current floor.
pub struct Elevator {
    pub(crate) cfg: SimConfig,

    pub(crate) position_m:   f64,
    pub(crate) velocity:     f64,
    pub(crate) acceleration: f64,

    pub(crate) target_floor:  Option<u32>,
    pub(crate) queue:         Vec<u32>,
    pub(crate) arrival_floor: Option<u32>,
    pub(crate) state:         MotionState,

    pub(crate) doors_open:    bool,
    pub(crate) door_progress: f64,
    /// `Some(open)` while a jam forces the doors into `open`.
    pub(crate) door_hold:     Option<bool>,
    pub(crate) auto_close_at: Option<SimTime>,
    pub(crate) cycle:         DoorCycle,

    pub(crate) load_kg:            f64,
    pub(crate) occupant_present:   bool,
    pub(crate) occupant_weight_kg: f64,
    pub(crate) last_door_action:   Option<SimTime>,

    pub(crate) components: ComponentHealth,

    pub(crate) events: Vec<CabinEvent>,
}

impl Elevator {
    /// A cabin parked at `cfg.initial_floor` with its doors closed.
    pub fn new(cfg: &SimConfig) -> Self {
        Self {
            cfg:                cfg.clone(),
            position_m:         cfg.floor_position(cfg.initial_floor.min(cfg.top_floor())),
            velocity:           0.0,
            acceleration:       0.0,
            target_floor:       None,
            queue:              Vec::new(),
            arrival_floor:      None,
            state:              MotionState::Idle,
            doors_open:         false,
            door_progress:      0.0,
            door_hold:          None,
            auto_close_at:      None,
            cycle:              DoorCycle::default(),
            load_kg:            0.0,
            occupant_present:   false,
            occupant_weight_kg: 0.0,
            last_door_action:   None,
            components:         ComponentHealth::default(),
            events:             Vec::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nearest floor to the current position.
    pub fn current_floor(&self) -> u32 {
        let raw = (self.position_m / self.cfg.floor_height_m).round();
        self.cfg.clamp_floor(raw as i64)
    }

    pub fn position_m(&self) -> f64 {
        self.position_m
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn target_floor(&self) -> Option<u32> {
        self.target_floor
    }

    pub fn queue(&self) -> &[u32] {
        &self.queue
    }

    /// Floor of the most recent arrival, cleared when a new trip starts.
    pub fn arrival_floor(&self) -> Option<u32> {
        self.arrival_floor
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn doors_open(&self) -> bool {
        self.doors_open
    }

    /// 0 = fully closed, 1 = fully open.
    pub fn door_progress(&self) -> f64 {
        self.door_progress
    }

    /// `Some(open)` while a jam holds the doors.
    pub fn door_hold(&self) -> Option<bool> {
        self.door_hold
    }

    pub fn load_kg(&self) -> f64 {
        self.load_kg
    }

    pub fn occupant_present(&self) -> bool {
        self.occupant_present
    }

    pub fn components(&self) -> &ComponentHealth {
        &self.components
    }

    pub fn cycle(&self) -> &DoorCycle {
        &self.cycle
    }

    /// Per-cycle flags are owned by the world's boarding logic.
    pub fn cycle_mut(&mut self) -> &mut DoorCycle {
        &mut self.cycle
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// `true` when the cabin is stationary within the arrival window of `floor`.
    pub fn is_at_floor(&self, floor: u32) -> bool {
        self.velocity.abs() < IDLE_EPSILON
            && (self.position_m - self.cfg.floor_position(floor)).abs() < crate::ARRIVAL_DISTANCE
    }

    /// `true` while `floor` is the target, is queued, or is being served
    /// with the doors open.
    pub fn plans_to_serve(&self, floor: u32) -> bool {
        self.target_floor == Some(floor)
            || self.queue.contains(&floor)
            || (self.doors_open && self.is_at_floor(floor))
    }

    /// `true` once the door cooldown since the last enter/exit has elapsed.
    pub fn cooldown_ready(&self, now: SimTime) -> bool {
        self.cooldown_remaining(now) == 0
    }

    fn cooldown_remaining(&self, now: SimTime) -> u64 {
        match self.last_door_action {
            None => 0,
            Some(last) => self.cfg.door_cooldown_ms.saturating_sub(now.since(last)),
        }
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<CabinEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Destination request from inside the cabin.  Out-of-range floors are
    /// clamped into the shaft; returns the floor actually requested.
    pub fn request_floor(&mut self, floor: i64, now: SimTime) -> CommandResult<u32> {
        let floor = self.cfg.clamp_floor(floor);
        self.enqueue(floor, now)?;
        Ok(floor)
    }

    /// Hall request routed by the dispatcher.  A request for the floor the
    /// cabin is standing at with open doors keeps them open a while longer.
    pub fn request_external(&mut self, floor: u32, now: SimTime) -> CommandResult<()> {
        let floor = floor.min(self.cfg.top_floor());
        if self.doors_open && self.door_hold.is_none() && self.is_at_floor(floor) {
            self.auto_close_at = Some(now + self.cfg.auto_close_ms);
        }
        self.enqueue(floor, now)
    }

    fn enqueue(&mut self, floor: u32, _now: SimTime) -> CommandResult<()> {
        if self.state == MotionState::Emergency {
            return Err(Refusal::Emergency);
        }
        if self.doors_open && self.is_at_floor(floor) {
            // Already here with the doors open: nothing to travel to.
            return Ok(());
        }
        if self.target_floor == Some(floor) || self.queue.contains(&floor) {
            return Err(Refusal::AlreadyRequested { floor });
        }
        if self.target_floor.is_none() && !self.doors_open && self.door_progress == 0.0 {
            self.target_floor = Some(floor);
            self.arrival_floor = None;
        } else {
            self.queue.push(floor);
        }
        Ok(())
    }

    /// Move an in-flight target back to the head of the queue.  Called
    /// whenever the doors open, so a target is never held with open doors.
    pub(crate) fn park_target(&mut self) {
        if let Some(target) = self.target_floor.take() {
            self.queue.retain(|&f| f != target);
            self.queue.insert(0, target);
        }
    }

    // ── Doors ─────────────────────────────────────────────────────────────

    /// Command the doors open.  (Re)arms the auto-close timer.
    pub fn open_doors(&mut self, now: SimTime) -> CommandResult<()> {
        if self.door_hold.is_some() {
            return Err(Refusal::DoorsHeld);
        }
        if self.components.door < MIN_DOOR_HEALTH {
            return Err(Refusal::DoorHealthLow { health: self.components.door });
        }
        if self.velocity.abs() > IDLE_EPSILON {
            return Err(Refusal::InMotion);
        }
        if !self.doors_open {
            self.doors_open = true;
            self.cycle = DoorCycle { opened_at: Some(now), board_handled: false, exit_handled: false };
            self.park_target();
            self.events.push(CabinEvent::DoorsOpened);
        }
        self.auto_close_at = Some(now + self.cfg.auto_close_ms);
        Ok(())
    }

    /// Command the doors closed and cancel any pending auto-close.
    pub fn close_doors(&mut self, _now: SimTime) -> CommandResult<()> {
        if self.door_hold.is_some() {
            return Err(Refusal::DoorsHeld);
        }
        if self.components.door < MIN_DOOR_HEALTH {
            return Err(Refusal::DoorHealthLow { health: self.components.door });
        }
        if self.occupant_present && self.load_kg > self.cfg.overload_limit_kg {
            return Err(Refusal::Overload { load_kg: self.load_kg, limit_kg: self.cfg.overload_limit_kg });
        }
        if self.doors_open {
            self.doors_open = false;
            self.events.push(CabinEvent::DoorsClosed);
        }
        self.auto_close_at = None;
        Ok(())
    }

    /// Fire the auto-close timer if it is due, honouring the configured policy.
    pub(crate) fn run_auto_close(&mut self, now: SimTime) {
        if self.door_hold.is_some() {
            return;
        }
        let Some(due) = self.auto_close_at else { return };
        if now < due {
            return;
        }
        if self.cfg.auto_close == AutoClosePolicy::WhenVacant && self.occupant_present {
            self.auto_close_at = Some(now + self.cfg.auto_close_ms);
            return;
        }
        if let Err(refusal) = self.close_doors(now) {
            debug!("auto-close refused: {refusal}");
            self.auto_close_at = Some(now + self.cfg.auto_close_ms);
        }
    }

    /// Jam override: slam the doors fully open or shut and hold them there
    /// until [`release_door_hold`][Self::release_door_hold].
    pub fn force_doors(&mut self, open: bool, now: SimTime) {
        let was_open = self.doors_open;
        self.doors_open = open;
        self.door_progress = if open { 1.0 } else { 0.0 };
        self.door_hold = Some(open);
        self.auto_close_at = None;
        if open {
            self.velocity = 0.0;
            self.acceleration = 0.0;
            self.park_target();
            if !was_open {
                self.cycle = DoorCycle { opened_at: Some(now), board_handled: false, exit_handled: false };
            }
        }
        match (was_open, open) {
            (false, true) => self.events.push(CabinEvent::DoorsOpened),
            (true, false) => self.events.push(CabinEvent::DoorsClosed),
            _ => {}
        }
    }

    /// Lift a jam hold.  Doors left open get a fresh auto-close timer.
    pub fn release_door_hold(&mut self, now: SimTime) {
        if self.door_hold.take().is_some() && self.doors_open {
            self.auto_close_at = Some(now + self.cfg.auto_close_ms);
        }
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    fn check_passable(&self, now: SimTime) -> CommandResult<()> {
        if !self.doors_open || self.door_progress < DOOR_PASSABLE {
            return Err(Refusal::DoorsNotReady);
        }
        let remaining_ms = self.cooldown_remaining(now);
        if remaining_ms > 0 {
            return Err(Refusal::Cooldown { remaining_ms });
        }
        Ok(())
    }

    /// The tracked passenger steps in.
    pub fn enter_passenger(&mut self, weight_kg: f64, now: SimTime) -> CommandResult<()> {
        self.check_passable(now)?;
        if self.occupant_present {
            return Err(Refusal::AlreadyInside);
        }
        let load_kg = self.load_kg + weight_kg;
        if load_kg > self.cfg.overload_limit_kg {
            return Err(Refusal::Overload { load_kg, limit_kg: self.cfg.overload_limit_kg });
        }
        self.load_kg = load_kg;
        self.occupant_present = true;
        self.occupant_weight_kg = weight_kg;
        self.last_door_action = Some(now);
        Ok(())
    }

    /// The tracked passenger steps out.
    pub fn exit_passenger(&mut self, weight_kg: f64, now: SimTime) -> CommandResult<()> {
        self.check_passable(now)?;
        if !self.occupant_present {
            return Err(Refusal::NotInside);
        }
        self.load_kg = (self.load_kg - weight_kg).max(0.0);
        self.occupant_present = false;
        self.occupant_weight_kg = 0.0;
        self.last_door_action = Some(now);
        Ok(())
    }

    /// Add (positive) or remove (negative) third-party cargo.  Removal never
    /// dips into the passenger's own weight.  Returns the change applied.
    pub fn adjust_cargo(&mut self, delta_kg: f64) -> CommandResult<f64> {
        if delta_kg >= 0.0 {
            let load_kg = self.load_kg + delta_kg;
            if load_kg > self.cfg.overload_limit_kg {
                return Err(Refusal::Overload { load_kg, limit_kg: self.cfg.overload_limit_kg });
            }
            self.load_kg = load_kg;
            return Ok(delta_kg);
        }
        let reserved = if self.occupant_present { self.occupant_weight_kg } else { 0.0 };
        let removable = (self.load_kg - reserved).max(0.0);
        let removed = (-delta_kg).min(removable);
        self.load_kg -= removed;
        Ok(-removed)
    }

    // ── Components & emergency ────────────────────────────────────────────

    /// Change `component`'s health by `delta` percentage points.
    pub fn adjust_health(&mut self, component: Component, delta: f64) -> f64 {
        self.components.adjust(component, delta)
    }

    pub fn set_health(&mut self, component: Component, health: f64) {
        self.components.set(component, health);
    }

    /// Freeze all motion until [`clear_emergency`][Self::clear_emergency].
    pub fn emergency_stop(&mut self) {
        self.state = MotionState::Emergency;
        self.velocity = 0.0;
        self.acceleration = 0.0;
    }

    /// Returns `true` if an emergency was actually cleared.
    pub fn clear_emergency(&mut self) -> bool {
        if self.state != MotionState::Emergency {
            return false;
        }
        self.state = MotionState::Idle;
        true
    }
}
