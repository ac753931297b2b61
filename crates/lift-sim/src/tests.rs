//! Scenario tests for lift-sim.

use std::cell::RefCell;
use std::rc::Rc;

use lift_cabin::Refusal;
use lift_core::{BoardingMode, CallId, Component, Direction, NpcId, SimConfig, SimTime};
use lift_schedule::EventKind;

use crate::{
    CallStatus, CommandError, Notification, Requester, TickSummary, World, WorldObserver,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// No NPCs and no random events: fully scripted runs.
fn quiet_config() -> SimConfig {
    SimConfig { npc_count: 0, event_rate_per_sec: 0.0, ..SimConfig::default() }
}

fn quiet_world() -> World {
    World::new(&quiet_config()).unwrap()
}

fn run_secs(world: &mut World, secs: f64) {
    let steps = (secs * 1_000.0 / world.config().tick_ms as f64).round() as u64;
    world.run_steps(steps);
}

/// Step until `pred` holds, up to `max_secs`.  Returns whether it did.
fn run_until(world: &mut World, max_secs: f64, pred: impl Fn(&World) -> bool) -> bool {
    let steps = (max_secs * 1_000.0 / world.config().tick_ms as f64) as u64;
    for _ in 0..steps {
        if pred(world) {
            return true;
        }
        world.step();
    }
    pred(world)
}

fn doors_passable(world: &World) -> bool {
    world.elevator().doors_open() && world.elevator().door_progress() >= 0.98
}

#[derive(Default)]
struct Recorder {
    notes: Vec<(SimTime, Notification)>,
    ticks: usize,
    last:  Option<TickSummary>,
}

impl WorldObserver for Recorder {
    fn on_notification(&mut self, at: SimTime, notification: &Notification) {
        self.notes.push((at, notification.clone()));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.ticks += 1;
        self.last = Some(summary.clone());
    }
}

impl Recorder {
    fn count(&self, kind: &str) -> usize {
        self.notes.iter().filter(|(_, n)| n.kind() == kind).count()
    }
}

fn recorded(world: &mut World) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    world.subscribe(Rc::clone(&recorder));
    recorder
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::{SimError, WorldBuilder};

    #[test]
    fn rejects_invalid_config() {
        let cfg = SimConfig { floors: 1, ..SimConfig::default() };
        assert!(matches!(World::new(&cfg), Err(SimError::Config(_))));
    }

    #[test]
    fn fresh_world_starts_at_initial_floor() {
        let cfg = SimConfig { initial_floor: 3, ..quiet_config() };
        let world = WorldBuilder::new(cfg).build().unwrap();
        assert_eq!(world.elevator().current_floor(), 3);
        assert_eq!(world.passenger().floor, 3);
        assert!(!world.passenger().inside);
        assert_eq!(world.now(), SimTime::ZERO);
        assert!(world.calls().is_empty());
    }

    #[test]
    fn builder_observers_see_every_step() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut world = WorldBuilder::new(quiet_config())
            .observer(Rc::clone(&recorder))
            .build()
            .unwrap();
        world.run_steps(25);
        assert_eq!(recorder.borrow().ticks, 25);
        let last = recorder.borrow().last.clone().unwrap();
        assert_eq!(last.at, SimTime(25 * 50));
    }
}

// ── Call submission ───────────────────────────────────────────────────────────

#[cfg(test)]
mod calls {
    use super::*;

    #[test]
    fn out_of_range_and_impossible_calls_refused() {
        let mut world = quiet_world();
        assert_eq!(
            world.submit_call(10, Direction::Down, Requester::Passenger),
            Err(CommandError::InvalidFloor { floor: 10, floors: 10 })
        );
        assert_eq!(
            world.submit_call(9, Direction::Up, Requester::Passenger),
            Err(CommandError::InvalidDirection { floor: 9, direction: Direction::Up })
        );
        assert!(world.submit_call(0, Direction::Down, Requester::Passenger).is_err());
        assert!(world.calls().is_empty());
    }

    #[test]
    fn duplicate_live_call_suppressed() {
        let mut world = quiet_world();
        let first = world.submit_call(4, Direction::Up, Requester::Passenger).unwrap();
        assert_eq!(
            world.submit_call(4, Direction::Up, Requester::Passenger),
            Err(CommandError::DuplicateCall { existing: first })
        );
        assert_eq!(world.calls().live_count(), 1);

        // Still suppressed once the dispatcher has assigned it.
        world.step();
        assert_eq!(world.calls().get(first).unwrap().status, CallStatus::Assigned);
        assert!(world.submit_call(4, Direction::Up, Requester::Passenger).is_err());
        assert_eq!(world.calls().live_count(), 1);
    }

    #[test]
    fn duplicates_are_per_requester_class() {
        let mut world = quiet_world();
        world.submit_call(6, Direction::Down, Requester::Npc(NpcId(0))).unwrap();
        assert!(matches!(
            world.submit_call(6, Direction::Down, Requester::Npc(NpcId(1))),
            Err(CommandError::DuplicateCall { .. })
        ));
        world.submit_call(6, Direction::Down, Requester::Passenger).unwrap();
        world.submit_call(6, Direction::Up, Requester::Npc(NpcId(1))).unwrap();
        assert_eq!(world.calls().live_count(), 3);
    }

    #[test]
    fn passenger_repeat_is_debounced() {
        let mut world = quiet_world();
        world.call_elevator(Direction::Up).unwrap();
        // Cabin is already at floor 0: the doors open and serve the call
        // well inside the debounce window.
        assert!(run_until(&mut world, 1.7, |w| w.calls().live_count() == 0));
        assert!(world.now().0 < crate::CALL_DEBOUNCE_MS);
        assert_eq!(world.call_elevator(Direction::Up), Err(CommandError::Debounced));

        run_secs(&mut world, 1.0);
        assert!(world.call_elevator(Direction::Up).is_ok());
    }

    #[test]
    fn passenger_inside_cannot_hall_call() {
        let mut world = quiet_world();
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        world.board().unwrap();
        assert_eq!(world.call_elevator(Direction::Up), Err(CommandError::PassengerInside));
    }

    #[test]
    fn served_calls_are_capped() {
        let mut book = crate::CallBook::new();
        let mut last = CallId(0);
        for i in 0..40u64 {
            let floor = (i % 9 + 1) as u32;
            let now = SimTime(i * 1_000);
            last = book.submit(floor, Direction::Down, Requester::Npc(NpcId(0)), now).unwrap();
            assert_eq!(book.serve_floor(floor, now), vec![last]);
        }
        assert_eq!(book.len(), crate::SERVED_RETENTION);
        assert!(book.get(last).is_some());
        assert!(book.get(CallId(0)).is_none());
        assert_eq!(book.next_id(), CallId(40));
    }

    #[test]
    fn nearest_pending_prefers_oldest_on_tie() {
        let mut book = crate::CallBook::new();
        book.submit(7, Direction::Down, Requester::Passenger, SimTime::ZERO).unwrap();
        book.submit(3, Direction::Up, Requester::Passenger, SimTime::ZERO).unwrap();
        book.submit(8, Direction::Up, Requester::Npc(NpcId(2)), SimTime::ZERO).unwrap();
        assert_eq!(book.nearest_pending(5), Some((0, 7)));
        assert_eq!(book.nearest_pending(2), Some((1, 3)));
    }
}

// ── Dispatch & journeys ───────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn call_is_assigned_travelled_to_and_served() {
        let mut world = quiet_world();
        let recorder = recorded(&mut world);
        let id = world.submit_call(5, Direction::Up, Requester::Passenger).unwrap();

        world.step();
        assert_eq!(world.elevator().target_floor(), Some(5));
        assert_eq!(world.calls().get(id).unwrap().status, CallStatus::Assigned);

        assert!(run_until(&mut world, 40.0, |w| {
            w.calls().get(id).map(|c| c.status) == Some(CallStatus::Served)
        }));
        assert_eq!(world.elevator().arrival_floor(), Some(5));
        assert_eq!(world.elevator().current_floor(), 5);
        assert_eq!(world.elevator().velocity(), 0.0);
        assert!(world.elevator().doors_open());

        let rec = recorder.borrow();
        assert_eq!(rec.count("call_submitted"), 1);
        assert_eq!(rec.count("arrived"), 1);
        assert_eq!(rec.count("call_served"), 1);
        assert!(rec.notes.iter().any(|(_, n)| *n == Notification::DoorChanged { open: true, floor: 5 }));
    }

    #[test]
    fn open_doors_serve_every_call_on_the_floor() {
        let mut world = quiet_world();
        let up = world.submit_call(4, Direction::Up, Requester::Passenger).unwrap();
        let down = world.submit_call(4, Direction::Down, Requester::Npc(NpcId(0))).unwrap();
        assert!(run_until(&mut world, 40.0, |w| w.calls().live_count() == 0));
        assert_eq!(world.calls().get(up).unwrap().status, CallStatus::Served);
        assert_eq!(world.calls().get(down).unwrap().status, CallStatus::Served);
    }

    #[test]
    fn nearest_call_dispatched_first() {
        let cfg = SimConfig { initial_floor: 5, ..quiet_config() };
        let mut world = World::new(&cfg).unwrap();
        let far = world.submit_call(9, Direction::Down, Requester::Passenger).unwrap();
        let near = world.submit_call(3, Direction::Up, Requester::Passenger).unwrap();
        world.step();
        assert_eq!(world.elevator().target_floor(), Some(3));
        assert_eq!(world.calls().get(near).unwrap().status, CallStatus::Assigned);
        assert_eq!(world.calls().get(far).unwrap().status, CallStatus::Pending);

        assert!(run_until(&mut world, 90.0, |w| w.calls().live_count() == 0));
        assert!(world.calls().get(near).unwrap().served_at < world.calls().get(far).unwrap().served_at);
    }

    #[test]
    fn dead_door_cannot_open() {
        let mut world = quiet_world();
        world.elevator.set_health(Component::Door, 0.0);
        assert!(matches!(world.open_doors(), Err(CommandError::Cabin(Refusal::DoorHealthLow { .. }))));
        assert!(!world.elevator().doors_open());
    }

    #[test]
    fn emergency_freezes_until_acknowledged() {
        let mut world = quiet_world();
        let recorder = recorded(&mut world);
        world.submit_call(6, Direction::Down, Requester::Passenger).unwrap();
        run_secs(&mut world, 2.0);
        world.emergency_stop();
        let frozen = world.elevator().position_m();
        run_secs(&mut world, 5.0);
        assert_eq!(world.elevator().position_m(), frozen);
        assert_eq!(world.elevator().velocity(), 0.0);

        assert!(world.acknowledge_emergency());
        assert!(!world.acknowledge_emergency());
        assert!(run_until(&mut world, 40.0, |w| w.elevator().arrival_floor() == Some(6)));
        assert_eq!(recorder.borrow().count("emergency_changed"), 2);
    }
}

// ── Boarding ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod boarding {
    use super::*;

    #[test]
    fn manual_journey() {
        let mut world = quiet_world();
        let recorder = recorded(&mut world);

        world.call_elevator(Direction::Up).unwrap();
        assert!(run_until(&mut world, 5.0, doors_passable));
        world.board().unwrap();
        assert!(world.passenger().inside);
        assert_eq!(world.elevator().load_kg(), 80.0);
        assert!(matches!(world.board(), Err(CommandError::PassengerInside)));

        assert_eq!(world.select_destination(4), Ok(4));
        assert_eq!(world.passenger().destination, Some(4));
        assert!(run_until(&mut world, 60.0, |w| {
            w.elevator().arrival_floor() == Some(4) && doors_passable(w)
        }));
        world.alight().unwrap();
        assert!(!world.passenger().inside);
        assert_eq!(world.passenger().floor, 4);
        assert_eq!(world.passenger().destination, None);
        assert_eq!(world.elevator().load_kg(), 0.0);
        assert!(matches!(world.alight(), Err(CommandError::NoOccupant)));

        let rec = recorder.borrow();
        assert!(rec.notes.iter().any(|(_, n)| *n == Notification::Boarded { floor: 0 }));
        assert!(rec.notes.iter().any(|(_, n)| *n == Notification::Exited { floor: 4 }));
    }

    #[test]
    fn destination_requires_passenger_inside() {
        let mut world = quiet_world();
        assert_eq!(world.select_destination(3), Err(CommandError::NoOccupant));
    }

    #[test]
    fn destination_clamps_into_building() {
        let mut world = quiet_world();
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        world.board().unwrap();
        assert_eq!(world.select_destination(99), Ok(9));
        assert_eq!(world.select_destination(-5), Ok(0));
    }

    #[test]
    fn cannot_board_elsewhere() {
        let cfg = SimConfig { initial_floor: 2, ..quiet_config() };
        let mut world = World::new(&cfg).unwrap();
        world.passenger.floor = 0;
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        assert_eq!(world.board(), Err(CommandError::NotAtPassengerFloor { floor: 0 }));
    }

    #[test]
    fn overloaded_board_leaves_load_unchanged() {
        let mut world = quiet_world();
        let limit = world.config().overload_limit_kg;
        world.elevator.adjust_cargo(limit - 10.0).unwrap();
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        assert!(matches!(world.board(), Err(CommandError::Cabin(Refusal::Overload { .. }))));
        assert_eq!(world.elevator().load_kg(), limit - 10.0);
        assert!(!world.passenger().inside);
    }

    #[test]
    fn automatic_journey() {
        let cfg = SimConfig { initial_floor: 2, boarding: BoardingMode::Auto, ..quiet_config() };
        let mut world = World::new(&cfg).unwrap();
        world.passenger.floor = 0;

        world.call_elevator(Direction::Up).unwrap();
        assert!(run_until(&mut world, 30.0, |w| w.passenger().inside));
        assert_eq!(world.elevator().current_floor(), 0);

        world.select_destination(3).unwrap();
        assert!(run_until(&mut world, 60.0, |w| !w.passenger().inside));
        assert_eq!(world.passenger().floor, 3);
        assert_eq!(world.elevator().current_floor(), 3);
    }

    #[test]
    fn auto_board_revalidates_when_it_fires() {
        let cfg = SimConfig { boarding: BoardingMode::Auto, ..quiet_config() };
        let mut world = World::new(&cfg).unwrap();
        world.open_doors().unwrap();
        assert!(run_until(&mut world, 5.0, |w| w.elevator().cycle().board_handled));
        assert_eq!(world.events().len(), 1);

        // Shut the doors before the continuation runs.
        world.close_doors().unwrap();
        run_secs(&mut world, 1.0);
        assert!(world.events().is_empty());
        assert!(!world.passenger().inside);
        assert!(!world.elevator().cycle().board_handled);
    }

    #[test]
    fn failed_auto_board_waits_for_the_next_opening() {
        let cfg = SimConfig { boarding: BoardingMode::Auto, ..quiet_config() };
        let mut world = World::new(&cfg).unwrap();
        let limit = world.config().overload_limit_kg;
        world.elevator.adjust_cargo(limit - 10.0).unwrap();
        world.open_doors().unwrap();
        assert!(run_until(&mut world, 5.0, |w| w.elevator().cycle().board_handled));

        // The attempt fails on overload and is not rescheduled while open.
        run_secs(&mut world, 3.0);
        assert!(world.elevator().doors_open());
        assert!(!world.passenger().inside);
        assert!(world.events().is_empty());
        assert!(world.elevator().cycle().board_handled);

        // A fresh opening tries once more.
        world.elevator.adjust_cargo(-limit).unwrap();
        world.close_doors().unwrap();
        assert!(run_until(&mut world, 5.0, |w| w.elevator().door_progress() == 0.0));
        world.open_doors().unwrap();
        assert!(run_until(&mut world, 5.0, |w| w.passenger().inside));
    }

    #[test]
    fn manual_mode_never_boards_by_itself() {
        let mut world = quiet_world();
        world.open_doors().unwrap();
        run_secs(&mut world, 5.0);
        assert!(!world.passenger().inside);
        assert!(world.events().is_empty());
    }
}

// ── Mechanical events ─────────────────────────────────────────────────────────

#[cfg(test)]
mod mechanics {
    use super::*;

    fn repairs_queued(world: &World, component: Component) -> Vec<SimTime> {
        world
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::AutoRepair(component))
            .map(|e| e.fire_at)
            .collect()
    }

    #[test]
    fn jam_forced_shut_closes_and_schedules_repair() {
        let mut world = quiet_world();
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        assert!(world.elevator().doors_open());

        world.jam_doors(Component::Door, false);
        let now = world.now();
        assert!(!world.elevator().doors_open());
        assert_eq!(world.elevator().door_progress(), 0.0);
        let health = world.elevator().components().door;
        assert!((82.0..=94.0).contains(&health), "health {health}");

        let repairs = repairs_queued(&world, Component::Door);
        assert_eq!(repairs.len(), 1);
        assert!(repairs[0] >= now + 12_000 && repairs[0] <= now + 40_000);

        // Held shut until the repair.
        assert!(matches!(world.open_doors(), Err(CommandError::Cabin(Refusal::DoorsHeld))));
        run_secs(&mut world, 41.0);
        assert!(repairs_queued(&world, Component::Door).is_empty());
        assert!(world.elevator().door_hold().is_none());
        assert!(world.elevator().components().door > health);
        world.open_doors().unwrap();
    }

    #[test]
    fn jam_forced_open_stops_a_moving_cabin() {
        let mut world = quiet_world();
        world.submit_call(8, Direction::Down, Requester::Passenger).unwrap();
        run_secs(&mut world, 3.0);
        assert!(world.elevator().velocity().abs() > 0.1);

        world.jam_doors(Component::Door, true);
        assert!(world.elevator().doors_open());
        assert_eq!(world.elevator().velocity(), 0.0);
        run_secs(&mut world, 5.0);
        assert_eq!(world.elevator().velocity(), 0.0);
        // Held open: auto-close does not fire.
        assert!(world.elevator().doors_open());

        // After the repair the trip resumes.
        assert!(run_until(&mut world, 120.0, |w| w.elevator().arrival_floor() == Some(8)));
    }

    #[test]
    fn call_waits_out_doors_jammed_shut_in_transit() {
        let mut world = quiet_world();
        let id = world.submit_call(5, Direction::Up, Requester::Passenger).unwrap();
        run_secs(&mut world, 2.0);
        assert!(world.elevator().velocity().abs() > 0.1);
        world.jam_doors(Component::Door, false);

        // Arrives before the repair: doors stay shut and the call goes back
        // to pending instead of hanging on a cleared target.
        assert!(run_until(&mut world, 30.0, |w| w.elevator().arrival_floor() == Some(5)));
        world.step();
        assert!(world.elevator().door_hold().is_some());
        assert!(!world.elevator().doors_open());
        assert_eq!(world.elevator().target_floor(), None);
        assert_eq!(world.calls().get(id).unwrap().status, CallStatus::Pending);

        assert!(run_until(&mut world, 45.0, |w| {
            w.calls().get(id).unwrap().status == CallStatus::Served
        }));
        assert!(world.elevator().door_hold().is_none());
        assert!(world.elevator().doors_open());
        assert_eq!(world.elevator().current_floor(), 5);
        assert!(world.submit_call(5, Direction::Up, Requester::Passenger).is_ok());
    }

    #[test]
    fn dead_doors_keep_the_call_pending_until_mended() {
        let mut world = quiet_world();
        world.elevator.set_health(Component::Door, 0.0);
        let id = world.submit_call(4, Direction::Down, Requester::Passenger).unwrap();
        assert!(run_until(&mut world, 30.0, |w| w.elevator().arrival_floor() == Some(4)));

        run_secs(&mut world, 5.0);
        assert_eq!(world.elevator().current_floor(), 4);
        assert!(!world.elevator().doors_open());
        assert_eq!(world.calls().get(id).unwrap().status, CallStatus::Pending);
        assert_eq!(world.calls().live_count(), 1);

        world.elevator.set_health(Component::Door, 100.0);
        assert!(run_until(&mut world, 3.0, |w| {
            w.calls().get(id).unwrap().status == CallStatus::Served
        }));
    }

    #[test]
    fn alarm_schedules_control_repair() {
        let mut world = quiet_world();
        let recorder = recorded(&mut world);
        world.raise_alarm();
        let now = world.now();
        let repairs = repairs_queued(&world, Component::Control);
        assert_eq!(repairs.len(), 1);
        assert!(repairs[0] >= now + 12_000 && repairs[0] <= now + 40_000);
        assert_eq!(recorder.borrow().count("alarm_raised"), 1);

        run_secs(&mut world, 41.0);
        assert_eq!(recorder.borrow().count("repaired"), 1);
    }

    #[test]
    fn random_events_fire_and_repair() {
        let cfg = SimConfig { npc_count: 0, event_rate_per_sec: 0.5, ..SimConfig::default() };
        let mut world = World::new(&cfg).unwrap();
        let recorder = recorded(&mut world);
        run_secs(&mut world, 120.0);
        let jams = recorder.borrow().count("door_jammed");
        assert!(jams > 0);

        world.config.event_rate_per_sec = 0.0;
        run_secs(&mut world, 90.0);
        let rec = recorder.borrow();
        assert!(rec.count("repaired") >= rec.count("door_jammed"));
        assert!(world.elevator().door_hold().is_none());
    }

    #[test]
    fn random_jams_are_rate_limited() {
        // Every roll would succeed; the window cap is the only brake.
        let cfg = SimConfig { npc_count: 0, event_rate_per_sec: 1_000.0, ..SimConfig::default() };
        let mut world = World::new(&cfg).unwrap();
        let recorder = recorded(&mut world);
        run_secs(&mut world, 59.0);
        let pending = world
            .events()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::DoorJam(_)))
            .count();
        let fired = recorder.borrow().count("door_jammed");
        assert_eq!(pending + fired, lift_schedule::MAX_TRIGGERS_PER_WINDOW);
    }
}

// ── NPC traffic & determinism ─────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use super::*;

    #[test]
    fn npcs_place_calls() {
        let cfg = SimConfig { event_rate_per_sec: 0.0, ..SimConfig::default() };
        let mut world = World::new(&cfg).unwrap();
        let recorder = recorded(&mut world);
        run_secs(&mut world, 180.0);
        let rec = recorder.borrow();
        assert!(rec.notes.iter().any(|(_, n)| matches!(
            n,
            Notification::CallSubmitted { requester: Requester::Npc(_), .. }
        )));
    }

    #[test]
    fn zero_traffic_stays_quiet() {
        let cfg = SimConfig { npc_traffic: 0.0, event_rate_per_sec: 0.0, ..SimConfig::default() };
        let mut world = World::new(&cfg).unwrap();
        run_secs(&mut world, 300.0);
        assert!(world.calls().is_empty());
        assert_eq!(world.elevator().load_kg(), 0.0);
    }

    #[test]
    fn same_seed_same_run() {
        let cfg = SimConfig { event_rate_per_sec: 0.05, ..SimConfig::default() };
        let mut a = World::new(&cfg).unwrap();
        let mut b = World::new(&cfg).unwrap();
        for _ in 0..6_000 {
            a.step();
            b.step();
        }
        assert_eq!(a.summary(), b.summary());
        assert_eq!(a.log().collect::<Vec<_>>(), b.log().collect::<Vec<_>>());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn log_tail_is_bounded() {
        let cfg = SimConfig { npc_traffic: 5.0, ..SimConfig::default() };
        let mut world = World::new(&cfg).unwrap();
        run_secs(&mut world, 600.0);
        assert!(world.log().count() <= crate::LOG_TAIL);
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use super::*;
    use crate::WorldSnapshot;

    /// Passenger aboard, heading for floor 6, a second call pending.
    fn mid_journey() -> World {
        let mut world = quiet_world();
        world.open_doors().unwrap();
        run_secs(&mut world, 1.5);
        world.board().unwrap();
        world.select_destination(6).unwrap();
        world.submit_call(8, Direction::Down, Requester::Npc(NpcId(0))).unwrap();
        run_secs(&mut world, 9.0);
        assert!(world.elevator().velocity().abs() > 0.0);
        world
    }

    #[test]
    fn round_trip_preserves_observable_state() {
        let world = mid_journey();
        let json = world.to_json().unwrap();
        let restored = World::from_json_or_fresh(world.config(), &json).unwrap();

        assert_eq!(restored.elevator().current_floor(), world.elevator().current_floor());
        assert!((restored.elevator().position_m() - world.elevator().position_m()).abs() < 1e-9);
        assert_eq!(restored.elevator().target_floor(), world.elevator().target_floor());
        assert_eq!(restored.elevator().queue(), world.elevator().queue());
        assert_eq!(restored.elevator().doors_open(), world.elevator().doors_open());
        assert_eq!(restored.elevator().load_kg(), world.elevator().load_kg());
        assert_eq!(restored.elevator().occupant_present(), world.elevator().occupant_present());
        assert_eq!(restored.passenger(), world.passenger());
        let statuses = |w: &World| w.calls().iter().map(|c| (c.id, c.status)).collect::<Vec<_>>();
        assert_eq!(statuses(&restored), statuses(&world));
        assert_eq!(restored.now(), world.now());
        assert_eq!(restored.tick(), world.tick());
    }

    #[test]
    fn restored_world_finishes_the_journey() {
        let world = mid_journey();
        let json = world.to_json().unwrap();
        let mut restored = World::from_json_or_fresh(world.config(), &json).unwrap();
        assert!(run_until(&mut restored, 60.0, |w| {
            w.elevator().arrival_floor() == Some(6) && doors_passable(w)
        }));
        restored.alight().unwrap();
        assert_eq!(restored.passenger().floor, 6);
    }

    #[test]
    fn unreadable_text_gives_fresh_world() {
        let cfg = quiet_config();
        let world = World::from_json_or_fresh(&cfg, "{ this is not json").unwrap();
        assert_eq!(world.now(), SimTime::ZERO);
        assert_eq!(world.elevator().current_floor(), cfg.initial_floor);

        let world = World::from_json_or_fresh(&cfg, "[1, 2, 3]").unwrap();
        assert!(world.calls().is_empty());
    }

    #[test]
    fn damaged_fields_fall_back_individually() {
        let json = r#"{
            "saved_at": 5000,
            "elevator": { "position_m": "oops", "load_kg": 120.0, "door_progress": 7 },
            "passenger": 17,
            "calls": [
                { "id": 4, "floor": 2, "direction": "up", "requester": "passenger", "created_at": 10 },
                { "id": "bad" },
                { "id": 5, "floor": 99, "direction": "down", "requester": "passenger", "created_at": 10 }
            ],
            "events": "not a list",
            "log": [ { "at": 1, "message": "hello" } ]
        }"#;
        let world = World::from_json_or_fresh(&quiet_config(), json).unwrap();
        assert_eq!(world.now(), SimTime(5_000));
        assert_eq!(world.elevator().position_m(), 0.0);
        assert_eq!(world.elevator().load_kg(), 120.0);
        assert_eq!(world.elevator().door_progress(), 1.0);
        assert_eq!(world.passenger(), &crate::Passenger::default());
        assert_eq!(world.calls().len(), 1);
        assert_eq!(world.calls().get(CallId(4)).unwrap().status, CallStatus::Pending);
        assert_eq!(world.calls().next_id(), CallId(5));
        assert!(world.events().is_empty());
        assert_eq!(world.log().count(), 1);
    }

    #[test]
    fn value_decoding_is_lenient() {
        let value = serde_json::json!({ "version": "x", "tick": 12 });
        let snap = WorldSnapshot::from_value(&value);
        assert_eq!(snap.version, crate::SNAPSHOT_VERSION);
        assert_eq!(snap.tick, lift_core::Tick(12));
    }

    #[test]
    fn orphaned_assignments_return_to_pending() {
        let mut world = quiet_world();
        let id = world.submit_call(7, Direction::Down, Requester::Passenger).unwrap();
        world.step();
        let mut snap = world.snapshot();
        assert_eq!(snap.calls[0].status, CallStatus::Assigned);
        snap.elevator.target_floor = None;
        snap.elevator.queue.clear();

        let restored = crate::WorldBuilder::new(quiet_config()).resume_from(snap).build().unwrap();
        assert_eq!(restored.calls().get(id).unwrap().status, CallStatus::Pending);
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use super::*;
    use crate::{FixedStepDriver, FrameReport, MAX_CATCH_UP_STEPS};

    #[test]
    fn accumulates_partial_frames() {
        let mut world = quiet_world();
        let mut driver = FixedStepDriver::new(&world);
        assert_eq!(driver.frame(&mut world, 20).steps, 0);
        assert_eq!(driver.frame(&mut world, 30).steps, 1);
        assert_eq!(driver.frame(&mut world, 125).steps, 2);
        assert_eq!(driver.pending_ms(), 25);
        assert_eq!(world.now(), SimTime(150));
    }

    #[test]
    fn stalls_are_capped_and_dropped() {
        let mut world = quiet_world();
        let mut driver = FixedStepDriver::new(&world);
        let report = driver.frame(&mut world, 10_030);
        assert_eq!(report, FrameReport { steps: MAX_CATCH_UP_STEPS, dropped_ms: 10_030 - 30 - 400 });
        assert_eq!(driver.pending_ms(), 30);
        assert_eq!(world.now(), SimTime(400));
    }

    #[test]
    fn fast_forward_is_capped() {
        let mut world = quiet_world();
        assert_eq!(world.fast_forward(20 * 60 * 1_000), crate::driver::FAST_FORWARD_HORIZON_MS);
        assert_eq!(world.now(), SimTime(crate::driver::FAST_FORWARD_HORIZON_MS));
        assert_eq!(world.fast_forward(1_234), 1_234);
        assert_eq!(world.now(), SimTime(crate::driver::FAST_FORWARD_HORIZON_MS + 1_234));
    }

    #[test]
    fn fast_forward_completes_a_trip() {
        let mut world = quiet_world();
        let id = world.submit_call(7, Direction::Down, Requester::Passenger).unwrap();
        world.fast_forward(60_000);
        assert_eq!(world.calls().get(id).unwrap().status, CallStatus::Served);
        assert_eq!(world.elevator().current_floor(), 7);
        assert_eq!(world.elevator().velocity(), 0.0);
    }
}
