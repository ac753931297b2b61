//! Unit tests for lift-schedule.

use lift_core::{Component, SimConfig, SimRng, SimTime};

use crate::{EventKind, EventQueue, EventTrigger, NpcTraffic, ScheduledEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ms(n: u64) -> SimTime {
    SimTime(n)
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue {
    use super::*;

    #[test]
    fn empty_queue() {
        let mut q = EventQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.next_fire(), None);
        assert!(q.drain_due(ms(1_000_000)).is_empty());
    }

    #[test]
    fn drains_only_due_entries_in_time_order() {
        let mut q = EventQueue::new();
        q.push(ms(3_000), EventKind::AutoRepair(Component::Door));
        q.push(ms(1_000), EventKind::DoorJam(Component::Door));
        q.push(ms(9_000), EventKind::AutoBoard { floor: 2 });
        assert_eq!(q.len(), 3);
        assert_eq!(q.next_fire(), Some(ms(1_000)));

        let due = q.drain_due(ms(3_000));
        assert_eq!(
            due,
            vec![
                ScheduledEvent { fire_at: ms(1_000), kind: EventKind::DoorJam(Component::Door) },
                ScheduledEvent { fire_at: ms(3_000), kind: EventKind::AutoRepair(Component::Door) },
            ]
        );
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_fire(), Some(ms(9_000)));
    }

    #[test]
    fn same_time_entries_keep_insertion_order() {
        let mut q = EventQueue::new();
        q.push(ms(500), EventKind::AutoExit { floor: 4 });
        q.push(ms(500), EventKind::AutoBoard { floor: 1 });
        let kinds: Vec<EventKind> = q.drain_due(ms(500)).into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::AutoExit { floor: 4 }, EventKind::AutoBoard { floor: 1 }]);
        assert!(q.is_empty());
    }

    #[test]
    fn each_entry_consumed_once() {
        let mut q = EventQueue::new();
        q.push(ms(100), EventKind::DoorJam(Component::Motor));
        assert_eq!(q.drain_due(ms(200)).len(), 1);
        assert!(q.drain_due(ms(300)).is_empty());
    }

    #[test]
    fn iter_and_rebuild_preserve_contents() {
        let mut q = EventQueue::new();
        q.push(ms(7), EventKind::AutoRepair(Component::Control));
        q.push(ms(2), EventKind::DoorJam(Component::Door));
        let saved: Vec<ScheduledEvent> = q.iter().collect();
        assert_eq!(saved[0].fire_at, ms(2));

        let rebuilt = EventQueue::from_events(saved.iter().rev().copied());
        assert_eq!(rebuilt.iter().collect::<Vec<_>>(), saved);
        assert_eq!(rebuilt.len(), 2);
    }

    #[test]
    fn mechanical_kinds() {
        assert!(EventKind::DoorJam(Component::Door).is_mechanical());
        assert!(EventKind::AutoRepair(Component::Door).is_mechanical());
        assert!(!EventKind::AutoBoard { floor: 0 }.is_mechanical());
    }
}

// ── EventTrigger ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod trigger {
    use super::*;
    use crate::{MAX_TRIGGERS_PER_WINDOW, TRIGGER_WINDOW_MS};

    #[test]
    fn zero_rate_never_fires() {
        let mut t = EventTrigger::new();
        let mut rng = SimRng::new(3);
        for i in 0..10_000 {
            assert!(!t.should_trigger(0.0, 0.05, ms(i * 50), &mut rng));
        }
    }

    #[test]
    fn capped_per_window() {
        let mut t = EventTrigger::new();
        let mut rng = SimRng::new(3);
        // Huge rate: every roll inside the window would fire.
        let fired = (0..200).filter(|&i| t.should_trigger(1_000.0, 0.05, ms(i * 50), &mut rng)).count();
        assert_eq!(fired, MAX_TRIGGERS_PER_WINDOW);
        assert_eq!(t.recent_count(), MAX_TRIGGERS_PER_WINDOW);
    }

    #[test]
    fn window_rolls_forward() {
        let mut t = EventTrigger::new();
        let mut rng = SimRng::new(3);
        for i in 0..MAX_TRIGGERS_PER_WINDOW as u64 {
            assert!(t.should_trigger(1_000.0, 0.05, ms(i), &mut rng));
        }
        assert!(!t.should_trigger(1_000.0, 0.05, ms(10), &mut rng));
        assert!(t.should_trigger(1_000.0, 0.05, ms(TRIGGER_WINDOW_MS), &mut rng));
    }

    #[test]
    fn long_run_rate_is_plausible() {
        let mut t = EventTrigger::new();
        let mut rng = SimRng::new(11);
        // 0.01/s over 20 000 s of 1 s steps: expect about 200 triggers.
        let fired = (0..20_000u64)
            .filter(|&s| t.should_trigger(0.01, 1.0, SimTime::from_secs(s), &mut rng))
            .count();
        assert!((120..=280).contains(&fired), "fired {fired}");
    }
}

// ── NpcTraffic ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod npc {
    use super::*;
    use lift_core::NpcId;

    fn run(traffic: &mut NpcTraffic, secs: u64) -> Vec<crate::CallIntent> {
        (0..secs * 10).flat_map(|i| traffic.poll(ms(i * 100))).collect()
    }

    #[test]
    fn one_timer_per_npc() {
        let cfg = SimConfig { npc_count: 4, ..SimConfig::default() };
        let traffic = NpcTraffic::new(&cfg);
        assert_eq!(traffic.len(), 4);
        let ids: Vec<NpcId> = traffic.timers().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![NpcId(0), NpcId(1), NpcId(2), NpcId(3)]);
    }

    #[test]
    fn intents_are_valid_calls() {
        let cfg = SimConfig { npc_count: 6, ..SimConfig::default() };
        let mut traffic = NpcTraffic::new(&cfg);
        let intents = run(&mut traffic, 600);
        assert!(!intents.is_empty());
        for intent in &intents {
            assert!(intent.floor < cfg.floors);
            assert!(intent.direction.valid_from(intent.floor, cfg.floors));
        }
    }

    #[test]
    fn zero_traffic_is_silent() {
        let cfg = SimConfig { npc_traffic: 0.0, ..SimConfig::default() };
        let mut traffic = NpcTraffic::new(&cfg);
        assert!(run(&mut traffic, 600).is_empty());
    }

    #[test]
    fn heavier_traffic_calls_more() {
        let light = SimConfig { npc_traffic: 0.5, ..SimConfig::default() };
        let heavy = SimConfig { npc_traffic: 4.0, ..SimConfig::default() };
        let light_calls = run(&mut NpcTraffic::new(&light), 1_200).len();
        let heavy_calls = run(&mut NpcTraffic::new(&heavy), 1_200).len();
        assert!(heavy_calls > light_calls, "{heavy_calls} vs {light_calls}");
    }

    #[test]
    fn deterministic_for_a_seed() {
        let cfg = SimConfig::default();
        let a = run(&mut NpcTraffic::new(&cfg), 300);
        let b = run(&mut NpcTraffic::new(&cfg), 300);
        assert_eq!(a, b);
    }

    #[test]
    fn restore_keeps_known_timers_and_fills_gaps() {
        let cfg = SimConfig { npc_count: 3, ..SimConfig::default() };
        let original = NpcTraffic::new(&cfg);
        let mut saved: Vec<_> = original.timers().to_vec();
        saved.remove(1);
        saved.push(crate::NpcTimer { id: NpcId(9), next_action: ms(0), busy_until: ms(0) });

        let now = ms(50_000);
        let restored = NpcTraffic::restore(&cfg, saved, now);
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.timers()[0], original.timers()[0]);
        assert_eq!(restored.timers()[1].id, NpcId(1));
        assert!(restored.timers()[1].next_action > now);
        assert!(!restored.timers().iter().any(|t| t.id == NpcId(9)));
    }

    #[test]
    fn busy_npc_waits() {
        let cfg = SimConfig { npc_count: 1, ..SimConfig::default() };
        let mut traffic = NpcTraffic::restore(
            &cfg,
            vec![crate::NpcTimer { id: NpcId(0), next_action: ms(0), busy_until: ms(10_000) }],
            ms(0),
        );
        assert!(traffic.poll(ms(5_000)).is_empty());
        assert_eq!(traffic.timers()[0].next_action, ms(10_000));
        let intents = traffic.poll(ms(10_000));
        assert_eq!(intents.len(), 1);
    }
}
