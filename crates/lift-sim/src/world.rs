//! The `World` struct, its commands and the per-step pipeline.

use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use lift_cabin::{CabinEvent, CommandResult, Elevator, MotionState, Refusal};
use lift_core::{CallId, Component, Direction, SimClock, SimConfig, SimRng, SimTime, Tick};
use lift_schedule::{EventKind, EventQueue, EventTrigger, NpcTraffic, REPAIR_DELAY_MS};

use crate::{CallBook, CommandError, Notification, Requester, TickSummary, WorldObserver};

/// Entries kept in the in-memory log tail.
pub const LOG_TAIL: usize = 64;

// ── Passenger & log ───────────────────────────────────────────────────────────

/// The one passenger whose journey the world tracks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passenger {
    /// Where the passenger stands while outside the cabin.
    pub floor:       u32,
    /// Floor selected from inside the cabin, if any.
    pub destination: Option<u32>,
    pub inside:      bool,
}

impl Default for Passenger {
    fn default() -> Self {
        Self { floor: 0, destination: None, inside: false }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at:      SimTime,
    pub message: String,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The simulation: one cabin, its calls, NPC traffic and scheduled events.
///
/// Each step runs, in this order:
///
/// 1. **NPC timers**: due NPCs submit hall calls.
/// 2. **Events**: roll for a random mechanical event, then apply every
///    queued event whose fire time has been reached.
/// 3. **Cabin**: [`Elevator::step`]; cabin events become notifications.
/// 4. **Boarding**: serve calls at an open floor, cargo churn, and in
///    automatic mode schedule board/exit continuations.
/// 5. **Dispatch**: hand the nearest pending call to an idle cabin.
///
/// Nothing outside the world mutates the cabin; every passenger-facing
/// command goes through the methods below.
///
/// Create via [`World::new`] or [`WorldBuilder`][crate::WorldBuilder].
pub struct World {
    pub(crate) config:    SimConfig,
    pub(crate) clock:     SimClock,
    pub(crate) elevator:  Elevator,
    pub(crate) calls:     CallBook,
    pub(crate) passenger: Passenger,
    pub(crate) events:    EventQueue,
    pub(crate) trigger:   EventTrigger,
    pub(crate) npcs:      NpcTraffic,
    pub(crate) rng:       SimRng,
    pub(crate) log:       VecDeque<LogEntry>,
    pub(crate) observers: Vec<Box<dyn WorldObserver>>,
}

impl World {
    /// A fresh world from a validated configuration.
    pub fn new(config: &SimConfig) -> crate::SimResult<Self> {
        crate::WorldBuilder::new(config.clone()).build()
    }

    /// Construct without validating `config`.
    pub(crate) fn fresh(config: SimConfig) -> Self {
        let passenger = Passenger { floor: config.initial_floor, ..Passenger::default() };
        Self {
            clock:     SimClock::default(),
            elevator:  Elevator::new(&config),
            calls:     CallBook::new(),
            passenger,
            events:    EventQueue::new(),
            trigger:   EventTrigger::new(),
            npcs:      NpcTraffic::new(&config),
            rng:       SimRng::new(config.seed),
            log:       VecDeque::with_capacity(LOG_TAIL),
            observers: Vec::new(),
            config,
        }
    }

    /// Register an observer.  Observers are called in registration order.
    pub fn subscribe<O: WorldObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    pub fn tick(&self) -> Tick {
        self.clock.tick
    }

    pub fn elevator(&self) -> &Elevator {
        &self.elevator
    }

    pub fn calls(&self) -> &CallBook {
        &self.calls
    }

    pub fn passenger(&self) -> &Passenger {
        &self.passenger
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn npcs(&self) -> &NpcTraffic {
        &self.npcs
    }

    /// The most recent log entries, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn summary(&self) -> TickSummary {
        TickSummary {
            tick:          self.clock.tick,
            at:            self.clock.now,
            floor:         self.elevator.current_floor(),
            position_m:    self.elevator.position_m(),
            velocity:      self.elevator.velocity(),
            door_progress: self.elevator.door_progress(),
            doors_open:    self.elevator.doors_open(),
            load_kg:       self.elevator.load_kg(),
            pending_calls: self.calls.pending_count(),
            state:         self.elevator.state(),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    /// Submit a hall call.  Out-of-range floors, impossible directions,
    /// duplicates of a live call and passenger repeats inside the debounce
    /// window are refused.
    pub fn submit_call(
        &mut self,
        floor:     u32,
        direction: Direction,
        requester: Requester,
    ) -> Result<CallId, CommandError> {
        let floors = self.config.floors;
        let result = if floor >= floors {
            Err(CommandError::InvalidFloor { floor, floors })
        } else if !direction.valid_from(floor, floors) {
            Err(CommandError::InvalidDirection { floor, direction })
        } else {
            self.calls.submit(floor, direction, requester, self.clock.now)
        };
        match result {
            Ok(id) => {
                self.emit(Notification::CallSubmitted { id, floor, direction, requester });
                Ok(id)
            }
            Err(e) => {
                debug!("{requester} call {direction} at floor {floor} refused: {e}");
                Err(e)
            }
        }
    }

    /// The tracked passenger presses a hall button on their floor.
    pub fn call_elevator(&mut self, direction: Direction) -> Result<CallId, CommandError> {
        if self.passenger.inside {
            return Err(CommandError::PassengerInside);
        }
        self.submit_call(self.passenger.floor, direction, Requester::Passenger)
    }

    /// The passenger picks a destination from inside the cabin.  The floor
    /// is clamped into the building; returns the floor actually selected.
    pub fn select_destination(&mut self, floor: i64) -> Result<u32, CommandError> {
        if !self.passenger.inside {
            return Err(CommandError::NoOccupant);
        }
        let floor = match self.cabin_command(|cabin, now| cabin.request_floor(floor, now)) {
            Ok(f) => f,
            Err(CommandError::Cabin(Refusal::AlreadyRequested { floor })) => floor,
            Err(e) => return Err(e),
        };
        self.passenger.destination = Some(floor);
        self.push_log(format!("destination floor {floor} selected"));
        Ok(floor)
    }

    // ── Doors & occupancy ─────────────────────────────────────────────────

    pub fn open_doors(&mut self) -> Result<(), CommandError> {
        self.cabin_command(|cabin, now| cabin.open_doors(now))
    }

    pub fn close_doors(&mut self) -> Result<(), CommandError> {
        self.cabin_command(|cabin, now| cabin.close_doors(now))
    }

    /// The passenger steps into the cabin at their floor.
    pub fn board(&mut self) -> Result<(), CommandError> {
        if self.passenger.inside {
            return Err(CommandError::PassengerInside);
        }
        let floor = self.passenger.floor;
        if !self.elevator.is_at_floor(floor) {
            return Err(CommandError::NotAtPassengerFloor { floor });
        }
        let weight = self.config.passenger_weight_kg;
        self.cabin_command(|cabin, now| cabin.enter_passenger(weight, now))?;
        self.passenger.inside = true;
        info!("passenger boarded at floor {floor}");
        self.emit(Notification::Boarded { floor });
        Ok(())
    }

    /// The passenger steps out at the cabin's current floor.
    pub fn alight(&mut self) -> Result<(), CommandError> {
        if !self.passenger.inside {
            return Err(CommandError::NoOccupant);
        }
        let floor = self.elevator.current_floor();
        if !self.elevator.is_at_floor(floor) {
            return Err(CommandError::BetweenFloors);
        }
        let weight = self.config.passenger_weight_kg;
        self.cabin_command(|cabin, now| cabin.exit_passenger(weight, now))?;
        self.passenger.inside = false;
        self.passenger.floor = floor;
        if self.passenger.destination == Some(floor) {
            self.passenger.destination = None;
        }
        info!("passenger exited at floor {floor}");
        self.emit(Notification::Exited { floor });
        Ok(())
    }

    // ── Alarm & emergency ─────────────────────────────────────────────────

    /// Press the alarm button: informational, plus a control-panel repair
    /// visit some time later.
    pub fn raise_alarm(&mut self) {
        let floor = self.elevator.current_floor();
        let delay = self.rng.gen_range(REPAIR_DELAY_MS);
        let at = self.clock.now + delay;
        self.events.push(at, EventKind::AutoRepair(Component::Control));
        info!("alarm raised at floor {floor}; control repair due at {at}");
        self.emit(Notification::AlarmRaised { floor });
    }

    pub fn emergency_stop(&mut self) {
        if self.elevator.state() == MotionState::Emergency {
            return;
        }
        self.elevator.emergency_stop();
        warn!("emergency stop at {:.2} m", self.elevator.position_m());
        self.emit(Notification::EmergencyChanged { active: true });
    }

    /// Clear an emergency stop.  Returns `false` if none was active.
    pub fn acknowledge_emergency(&mut self) -> bool {
        if !self.elevator.clear_emergency() {
            return false;
        }
        info!("emergency acknowledged");
        self.emit(Notification::EmergencyChanged { active: false });
        true
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance one configured fixed step.
    pub fn step(&mut self) {
        self.advance(self.config.tick_ms);
    }

    /// Run `n` fixed steps.
    pub fn run_steps(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// One pass of the step pipeline covering `step_ms` milliseconds.
    pub(crate) fn advance(&mut self, step_ms: u64) {
        if step_ms == 0 {
            return;
        }
        self.clock.advance(step_ms);
        let now = self.clock.now;
        let dt = step_ms as f64 / 1_000.0;

        // ── ① NPC timers ──────────────────────────────────────────────────
        for intent in self.npcs.poll(now) {
            // Refusals are logged by submit_call.
            let _ = self.submit_call(intent.floor, intent.direction, Requester::Npc(intent.npc));
        }

        // ── ② Scheduled events ────────────────────────────────────────────
        self.roll_mechanical_event(dt, now);
        for ev in self.events.drain_due(now) {
            if ev.kind.is_mechanical() {
                debug!("firing {} (due {})", ev.kind, ev.fire_at);
            } else {
                trace!("firing {} (due {})", ev.kind, ev.fire_at);
            }
            self.apply_event(ev.kind, now);
        }

        // ── ③ Cabin physics and doors ─────────────────────────────────────
        self.elevator.step(dt, now);
        self.flush_cabin_events();

        // ── ④ Boarding / exit gating ──────────────────────────────────────
        self.step_boarding(dt, now);

        // ── ⑤ Dispatch ────────────────────────────────────────────────────
        self.dispatch(now);

        let summary = self.summary();
        for observer in &mut self.observers {
            observer.on_tick_end(&summary);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Run a cabin command at the current time, log a refusal, and forward
    /// any cabin events it raised.
    pub(crate) fn cabin_command<T>(
        &mut self,
        command: impl FnOnce(&mut Elevator, SimTime) -> CommandResult<T>,
    ) -> Result<T, CommandError> {
        let result = command(&mut self.elevator, self.clock.now);
        self.flush_cabin_events();
        result.map_err(|refusal| {
            debug!("cabin refused command: {refusal}");
            CommandError::Cabin(refusal)
        })
    }

    pub(crate) fn flush_cabin_events(&mut self) {
        for event in self.elevator.drain_events() {
            let floor = self.elevator.current_floor();
            let notification = match event {
                CabinEvent::DoorsOpened => Notification::DoorChanged { open: true, floor },
                CabinEvent::DoorsClosed => Notification::DoorChanged { open: false, floor },
                CabinEvent::Arrived { floor } => {
                    info!("arrived at floor {floor}");
                    Notification::Arrived { floor }
                }
            };
            self.emit(notification);
        }
    }

    /// Log `notification` to the tail and hand it to every observer.
    pub(crate) fn emit(&mut self, notification: Notification) {
        let at = self.clock.now;
        self.push_log(notification.to_string());
        for observer in &mut self.observers {
            observer.on_notification(at, &notification);
        }
    }

    pub(crate) fn push_log(&mut self, message: String) {
        if self.log.len() == LOG_TAIL {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry { at: self.clock.now, message });
    }
}
