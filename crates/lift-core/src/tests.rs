//! Unit tests for lift-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CallId, NpcId};

    #[test]
    fn next_is_sequential() {
        assert_eq!(CallId(7).next(), CallId(8));
        assert_eq!(NpcId(2).index(), 2);
    }

    #[test]
    fn ordering() {
        assert!(CallId(0) < CallId(1));
    }

    #[test]
    fn display() {
        assert_eq!(NpcId(3).to_string(), "NpcId(3)");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimTime, Tick};

    #[test]
    fn sim_time_arithmetic() {
        let t = SimTime(1_500);
        assert_eq!(t + 500, SimTime(2_000));
        assert_eq!(SimTime(2_000) - t, 500);
        assert_eq!(SimTime::from_secs(3), SimTime(3_000));
    }

    #[test]
    fn since_saturates() {
        assert_eq!(SimTime(100).since(SimTime(400)), 0);
    }

    #[test]
    fn clock_advance() {
        let mut clock = SimClock::default();
        clock.advance(50);
        clock.advance(50);
        assert_eq!(clock.tick, Tick(2));
        assert_eq!(clock.now, SimTime(100));
    }

    #[test]
    fn display_hms() {
        assert_eq!(SimTime(3_723_045).to_string(), "01:02:03.045");
    }
}

#[cfg(test)]
mod rng {
    use crate::{NpcId, NpcRng, SimRng};

    #[test]
    fn npc_rng_deterministic() {
        let mut a = NpcRng::new(42, NpcId(1));
        let mut b = NpcRng::new(42, NpcId(1));
        let va: u32 = a.gen_range(0..1_000_000);
        let vb: u32 = b.gen_range(0..1_000_000);
        assert_eq!(va, vb);
    }

    #[test]
    fn different_npcs_diverge() {
        let mut a = NpcRng::new(42, NpcId(0));
        let mut b = NpcRng::new(42, NpcId(1));
        let va: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let vb: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn gen_bool_clamps() {
        let mut rng = SimRng::new(1);
        assert!(rng.gen_bool(7.0));
        assert!(!rng.gen_bool(-1.0));
    }
}

#[cfg(test)]
mod component {
    use crate::{Component, ComponentHealth};

    #[test]
    fn adjust_clamps() {
        let mut h = ComponentHealth::default();
        assert_eq!(h.adjust(Component::Door, 25.0), 100.0);
        assert_eq!(h.adjust(Component::Door, -130.0), 0.0);
        assert_eq!(h.get(Component::Motor), 100.0);
    }

    #[test]
    fn sanitized_repairs_garbage() {
        let h = ComponentHealth { door: f64::NAN, motor: 140.0, control: -3.0 }.sanitized();
        assert_eq!(h, ComponentHealth { door: 100.0, motor: 100.0, control: 0.0 });
    }
}

#[cfg(test)]
mod direction {
    use crate::Direction;

    #[test]
    fn no_up_from_top_no_down_from_ground() {
        assert!(Direction::Up.valid_from(0, 10));
        assert!(!Direction::Up.valid_from(9, 10));
        assert!(Direction::Down.valid_from(9, 10));
        assert!(!Direction::Down.valid_from(0, 10));
    }

    #[test]
    fn display() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }
}

#[cfg(test)]
mod config {
    use crate::{LiftError, SimConfig};

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_single_floor() {
        let cfg = SimConfig { floors: 1, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(LiftError::Config(_))));
    }

    #[test]
    fn rejects_initial_floor_out_of_range() {
        let cfg = SimConfig { initial_floor: 10, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(LiftError::InvalidFloor { floor: 10, floors: 10 })));
    }

    #[test]
    fn rejects_zero_brake() {
        let cfg = SimConfig { brake_limit: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn floor_helpers() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.clamp_floor(-3), 0);
        assert_eq!(cfg.clamp_floor(42), 9);
        assert_eq!(cfg.floor_position(4), 12.0);
        assert_eq!(cfg.tick_secs(), 0.05);
    }
}
