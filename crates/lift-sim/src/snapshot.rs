//! Persisted world snapshot.
//!
//! # Format
//!
//! A snapshot is a JSON object:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": 183250,
//!   "tick": 3665,
//!   "elevator": { "position_m": 12.0, "queue": [7], "door_progress": 1.0, ... },
//!   "passenger": { "floor": 4, "destination": 7, "inside": true },
//!   "calls": [ { "id": 3, "floor": 4, "direction": "up", ... } ],
//!   "next_call_id": 4,
//!   "events": [ { "fire_at": 190000, "kind": { "auto_repair": "door" } } ],
//!   "npcs": [ { "id": 0, "next_action": 201000, "busy_until": 0 } ],
//!   "log": [ { "at": 183000, "message": "arrived at floor 4" } ]
//! }
//! ```
//!
//! # Degradation
//!
//! Decoding never fails the load.  Each top-level field, and each field of
//! the cabin, is decoded on its own: a missing or malformed field keeps its
//! default and logs a warning.  Unreadable list elements are skipped.  The
//! result is then sanitised by [`World::restore`], so a damaged file still
//! yields a world that satisfies every invariant.  Text that is not a JSON
//! object at all yields a fresh world.

use std::collections::VecDeque;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use lift_cabin::{Elevator, ElevatorSnapshot};
use lift_core::{CallId, SimClock, SimConfig, SimRng, SimTime, Tick};
use lift_schedule::{EventKind, EventQueue, EventTrigger, NpcTimer, NpcTraffic, ScheduledEvent};

use crate::{Call, CallBook, LogEntry, Passenger, SimResult, World, WorldBuilder, LOG_TAIL};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    pub version:      u32,
    pub saved_at:     SimTime,
    pub tick:         Tick,
    pub elevator:     ElevatorSnapshot,
    pub passenger:    Passenger,
    pub calls:        Vec<Call>,
    pub next_call_id: CallId,
    pub events:       Vec<ScheduledEvent>,
    pub npcs:         Vec<NpcTimer>,
    pub log:          Vec<LogEntry>,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            version:      SNAPSHOT_VERSION,
            saved_at:     SimTime::ZERO,
            tick:         Tick::ZERO,
            elevator:     ElevatorSnapshot::default(),
            passenger:    Passenger::default(),
            calls:        Vec::new(),
            next_call_id: CallId::default(),
            events:       Vec::new(),
            npcs:         Vec::new(),
            log:          Vec::new(),
        }
    }
}

// ── Lenient decoding ──────────────────────────────────────────────────────────

/// Overwrite each named field of `$target` with the same-named entry of the
/// JSON object `$obj`, when present and readable.
macro_rules! overlay {
    ($obj:expr, $target:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(raw) = $obj.get(stringify!($field)) {
                match serde_json::from_value(raw.clone()) {
                    Ok(value) => $target.$field = value,
                    Err(e) => warn!("snapshot field `{}` unreadable, using default: {e}", stringify!($field)),
                }
            }
        )*
    };
}

/// Decode `obj[key]` element by element, skipping unreadable elements.
fn lenient_list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(raw) = obj.get(key) else {
        return Vec::new();
    };
    let Some(items) = raw.as_array() else {
        warn!("snapshot field `{key}` is not a list, ignoring it");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("skipping unreadable `{key}` entry: {e}");
                None
            }
        })
        .collect()
}

impl WorldSnapshot {
    /// Decode a snapshot from an already-parsed JSON value, defaulting
    /// whatever is missing or malformed.
    pub fn from_value(value: &Value) -> WorldSnapshot {
        let mut snap = WorldSnapshot::default();
        let Some(obj) = value.as_object() else {
            warn!("snapshot is not a JSON object, using defaults");
            return snap;
        };

        overlay!(obj, snap, [version, saved_at, tick, passenger, next_call_id]);
        if let Some(cabin) = obj.get("elevator").and_then(Value::as_object) {
            snap.elevator = decode_cabin(cabin);
        }
        snap.calls = lenient_list(obj, "calls");
        snap.events = lenient_list(obj, "events");
        snap.npcs = lenient_list(obj, "npcs");
        snap.log = lenient_list(obj, "log");

        if snap.version != SNAPSHOT_VERSION {
            warn!("snapshot version {} differs from {SNAPSHOT_VERSION}, loading anyway", snap.version);
        }
        snap
    }
}

fn decode_cabin(obj: &Map<String, Value>) -> ElevatorSnapshot {
    let mut cabin = ElevatorSnapshot::default();
    overlay!(obj, cabin, [
        position_m, velocity, acceleration, target_floor, arrival_floor, state,
        doors_open, door_progress, door_hold, auto_close_at, cycle,
        load_kg, occupant_present, occupant_weight_kg, last_door_action, components,
    ]);
    cabin.queue = lenient_list(obj, "queue");
    cabin
}

// ── World save / restore ──────────────────────────────────────────────────────

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            version:      SNAPSHOT_VERSION,
            saved_at:     self.clock.now,
            tick:         self.clock.tick,
            elevator:     self.elevator.snapshot(),
            passenger:    self.passenger.clone(),
            calls:        self.calls.iter().cloned().collect(),
            next_call_id: self.calls.next_id(),
            events:       self.events.iter().collect(),
            npcs:         self.npcs.timers().to_vec(),
            log:          self.log.iter().cloned().collect(),
        }
    }

    /// Serialise the current state as pretty-printed JSON.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Rebuild a world from saved JSON.  Damaged fields fall back to their
    /// defaults; text that is not a JSON object gives a fresh world.  Only
    /// an invalid `config` is an error.
    pub fn from_json_or_fresh(config: &SimConfig, json: &str) -> SimResult<World> {
        let builder = WorldBuilder::new(config.clone());
        match serde_json::from_str::<Value>(json) {
            Ok(value) if value.is_object() => builder.resume_from(WorldSnapshot::from_value(&value)).build(),
            Ok(_) => {
                warn!("saved state is not a JSON object; starting fresh");
                builder.build()
            }
            Err(e) => {
                warn!("saved state unreadable ({e}); starting fresh");
                builder.build()
            }
        }
    }

    /// Reconstruct a live world from `snap`, repairing anything inconsistent
    /// with `config`.
    pub(crate) fn restore(config: SimConfig, snap: WorldSnapshot) -> World {
        let now = snap.saved_at;
        let floors = config.floors;
        let elevator = Elevator::restore(&config, snap.elevator);

        // The cabin's occupancy is authoritative.
        let passenger = Passenger {
            floor:       snap.passenger.floor.min(config.top_floor()),
            destination: snap.passenger.destination.filter(|&f| f < floors),
            inside:      elevator.occupant_present(),
        };

        let valid_calls = snap
            .calls
            .into_iter()
            .filter(|c| c.floor < floors && c.direction.valid_from(c.floor, floors))
            .collect();
        let mut calls = CallBook::restore(valid_calls, snap.next_call_id);
        calls.requeue_orphans(|f| elevator.plans_to_serve(f));

        let events = EventQueue::from_events(snap.events.into_iter().filter(|e| match e.kind {
            EventKind::AutoBoard { floor } | EventKind::AutoExit { floor } => floor < floors,
            EventKind::DoorJam(_) | EventKind::AutoRepair(_) => true,
        }));

        let skip = snap.log.len().saturating_sub(LOG_TAIL);
        let log: VecDeque<LogEntry> = snap.log.into_iter().skip(skip).collect();

        World {
            clock:     SimClock::resume(snap.tick, now),
            elevator,
            calls,
            passenger,
            events,
            trigger:   EventTrigger::new(),
            npcs:      NpcTraffic::restore(&config, snap.npcs, now),
            // Generator state is not persisted; reseed from the run seed.
            rng:       SimRng::new(config.seed).child(now.0),
            log,
            observers: Vec::new(),
            config,
        }
    }
}
