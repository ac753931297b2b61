//! NPC traffic: independent timers that occasionally press hall buttons.
//!
//! Each NPC alternates between being busy (it just called and is "riding"
//! or walking away) and idle.  When an idle NPC's `next_action` comes due it
//! emits one [`CallIntent`] for a random floor.  The traffic factor divides
//! the idle interval, so `2.0` doubles the call rate and `0.0` silences NPCs
//! entirely.
//!
//! NPC draws come from per-NPC [`NpcRng`]s, so NPC activity never perturbs
//! the world's mechanical-event stream.

use std::ops::RangeInclusive;

use lift_core::{Direction, NpcId, NpcRng, SimConfig, SimTime};

/// How long an NPC stays busy after calling.
pub const NPC_BUSY_MS: RangeInclusive<u64> = 8_000..=20_000;

/// Idle interval between an NPC's calls, before the traffic factor.
pub const NPC_IDLE_MS: RangeInclusive<u64> = 20_000..=60_000;

/// Delay before an NPC's first call after a fresh start.
const NPC_FIRST_MS: RangeInclusive<u64> = 5_000..=30_000;

/// Persisted per-NPC timer state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcTimer {
    pub id:          NpcId,
    pub next_action: SimTime,
    pub busy_until:  SimTime,
}

/// A hall call an NPC wants to place.  The world decides whether it sticks.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CallIntent {
    pub npc:       NpcId,
    pub floor:     u32,
    pub direction: Direction,
}

pub struct NpcTraffic {
    timers:  Vec<NpcTimer>,
    rngs:    Vec<NpcRng>,
    floors:  u32,
    traffic: f64,
}

impl NpcTraffic {
    /// `cfg.npc_count` NPCs with staggered first calls.
    pub fn new(cfg: &SimConfig) -> Self {
        let mut traffic = Self::empty(cfg);
        for i in 0..cfg.npc_count {
            let id = NpcId(i);
            let mut rng = NpcRng::new(cfg.seed, id);
            let first = scale(rng.gen_range(NPC_FIRST_MS), traffic.traffic);
            traffic.timers.push(NpcTimer { id, next_action: SimTime::ZERO + first, busy_until: SimTime::ZERO });
            traffic.rngs.push(rng);
        }
        traffic
    }

    /// Resume from persisted timers at `now`.
    ///
    /// Timers for NPCs beyond `cfg.npc_count`, or repeated ids, are dropped;
    /// missing NPCs start fresh.  Generator state is not persisted, so every
    /// NPC reseeds from the run seed mixed with `now`.
    pub fn restore(cfg: &SimConfig, saved: Vec<NpcTimer>, now: SimTime) -> Self {
        let mut traffic = Self::empty(cfg);
        let seed = cfg.seed ^ now.0;
        for i in 0..cfg.npc_count {
            let id = NpcId(i);
            let mut rng = NpcRng::new(seed, id);
            let timer = saved.iter().find(|t| t.id == id).copied().unwrap_or_else(|| NpcTimer {
                id,
                next_action: now + scale(rng.gen_range(NPC_FIRST_MS), traffic.traffic),
                busy_until:  now,
            });
            traffic.timers.push(timer);
            traffic.rngs.push(rng);
        }
        traffic
    }

    fn empty(cfg: &SimConfig) -> Self {
        Self {
            timers:  Vec::with_capacity(cfg.npc_count as usize),
            rngs:    Vec::with_capacity(cfg.npc_count as usize),
            floors:  cfg.floors,
            traffic: if cfg.npc_traffic.is_finite() { cfg.npc_traffic.max(0.0) } else { 0.0 },
        }
    }

    /// Advance every NPC timer to `now` and collect the calls they place.
    pub fn poll(&mut self, now: SimTime) -> Vec<CallIntent> {
        if self.traffic <= 0.0 || self.floors < 2 {
            return Vec::new();
        }
        let top = self.floors - 1;
        let mut intents = Vec::new();
        for (timer, rng) in self.timers.iter_mut().zip(self.rngs.iter_mut()) {
            if now < timer.next_action {
                continue;
            }
            if now < timer.busy_until {
                timer.next_action = timer.busy_until;
                continue;
            }
            let floor = rng.gen_range(0..=top);
            let direction = match floor {
                0 => Direction::Up,
                f if f == top => Direction::Down,
                _ if rng.gen_bool(0.5) => Direction::Up,
                _ => Direction::Down,
            };
            timer.busy_until = now + rng.gen_range(NPC_BUSY_MS);
            timer.next_action = now + scale(rng.gen_range(NPC_IDLE_MS), self.traffic);
            intents.push(CallIntent { npc: timer.id, floor, direction });
        }
        intents
    }

    pub fn timers(&self) -> &[NpcTimer] {
        &self.timers
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Divide an interval by the traffic factor.
fn scale(ms: u64, traffic: f64) -> u64 {
    if traffic <= 0.0 {
        return ms;
    }
    (ms as f64 / traffic).round() as u64
}
