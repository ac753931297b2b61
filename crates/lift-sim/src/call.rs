//! Hall calls and the call book.
//!
//! # Lifecycle
//!
//! ```text
//! submit ──► Pending ──dispatch──► Assigned ──doors settle open at floor──► Served
//! ```
//!
//! Opening the doors at a floor serves *every* live call there, not only the
//! one the dispatcher assigned.  Served calls are kept for inspection, but
//! only the most recent [`SERVED_RETENTION`] of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use lift_core::{CallId, Direction, NpcId, SimTime};

use crate::CommandError;

/// Repeat window for identical passenger calls.
pub const CALL_DEBOUNCE_MS: u64 = 1_800;

/// Served calls retained in the book.
pub const SERVED_RETENTION: usize = 32;

// ── Call ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requester {
    /// The tracked passenger.
    Passenger,
    Npc(NpcId),
}

impl Requester {
    /// Duplicate suppression works per class: all NPCs share one.
    pub fn same_class(self, other: Requester) -> bool {
        matches!(
            (self, other),
            (Requester::Passenger, Requester::Passenger) | (Requester::Npc(_), Requester::Npc(_))
        )
    }
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Passenger => f.write_str("passenger"),
            Requester::Npc(id)   => write!(f, "npc {}", id.0),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[default]
    Pending,
    Assigned,
    Served,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id:          CallId,
    pub floor:       u32,
    pub direction:   Direction,
    pub requester:   Requester,
    pub created_at:  SimTime,
    #[serde(default)]
    pub assigned_at: Option<SimTime>,
    #[serde(default)]
    pub served_at:   Option<SimTime>,
    #[serde(default)]
    pub status:      CallStatus,
}

impl Call {
    /// Pending or assigned.
    pub fn is_live(&self) -> bool {
        self.status != CallStatus::Served
    }
}

// ── CallBook ──────────────────────────────────────────────────────────────────

#[derive(Default, Debug)]
pub struct CallBook {
    calls:          Vec<Call>,
    next_id:        CallId,
    /// Last accepted passenger call, for debouncing.
    last_passenger: Option<(u32, Direction, SimTime)>,
}

impl CallBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted calls.  Later duplicates of a live call are
    /// dropped, and `next_id` never reuses a persisted id.
    pub fn restore(saved: Vec<Call>, next_id: CallId) -> Self {
        let mut book = Self::new();
        let mut max_id = None;
        for call in saved {
            if call.is_live() && book.live_duplicate(call.floor, call.direction, call.requester).is_some() {
                continue;
            }
            max_id = max_id.max(Some(call.id));
            book.calls.push(call);
        }
        book.next_id = match max_id {
            Some(id) if id >= next_id => id.next(),
            _ => next_id,
        };
        book.prune_served();
        book
    }

    /// Record a new pending call.  The floor and direction must already be
    /// validated against the building.
    pub fn submit(
        &mut self,
        floor:     u32,
        direction: Direction,
        requester: Requester,
        now:       SimTime,
    ) -> Result<CallId, CommandError> {
        if let Some(existing) = self.live_duplicate(floor, direction, requester) {
            return Err(CommandError::DuplicateCall { existing });
        }
        if requester == Requester::Passenger {
            if let Some((f, d, at)) = self.last_passenger {
                if f == floor && d == direction && now.since(at) < CALL_DEBOUNCE_MS {
                    return Err(CommandError::Debounced);
                }
            }
            self.last_passenger = Some((floor, direction, now));
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.calls.push(Call {
            id,
            floor,
            direction,
            requester,
            created_at:  now,
            assigned_at: None,
            served_at:   None,
            status:      CallStatus::Pending,
        });
        Ok(id)
    }

    fn live_duplicate(&self, floor: u32, direction: Direction, requester: Requester) -> Option<CallId> {
        self.calls
            .iter()
            .find(|c| c.is_live() && c.floor == floor && c.direction == direction && c.requester.same_class(requester))
            .map(|c| c.id)
    }

    /// Index and floor of the pending call closest to `floor`; ties go to
    /// the oldest.
    pub fn nearest_pending(&self, floor: u32) -> Option<(usize, u32)> {
        self.calls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.status == CallStatus::Pending)
            .min_by_key(|(_, c)| c.floor.abs_diff(floor))
            .map(|(i, c)| (i, c.floor))
    }

    pub fn assign(&mut self, idx: usize, now: SimTime) -> &Call {
        let call = &mut self.calls[idx];
        call.status = CallStatus::Assigned;
        call.assigned_at = Some(now);
        call
    }

    /// Serve every live call at `floor`.  Returns the ids served.
    pub fn serve_floor(&mut self, floor: u32, now: SimTime) -> Vec<CallId> {
        let mut served = Vec::new();
        for call in self.calls.iter_mut().filter(|c| c.is_live() && c.floor == floor) {
            call.status = CallStatus::Served;
            call.served_at = Some(now);
            served.push(call.id);
        }
        if !served.is_empty() {
            self.prune_served();
        }
        served
    }

    /// Put assigned calls whose floor the cabin no longer plans to visit
    /// back into the pending pool.
    pub fn requeue_orphans(&mut self, still_planned: impl Fn(u32) -> bool) {
        for call in self.calls.iter_mut().filter(|c| c.status == CallStatus::Assigned) {
            if !still_planned(call.floor) {
                call.status = CallStatus::Pending;
                call.assigned_at = None;
            }
        }
    }

    fn prune_served(&mut self) {
        let served = self.calls.iter().filter(|c| c.status == CallStatus::Served).count();
        let excess = served.saturating_sub(SERVED_RETENTION);
        if excess == 0 {
            return;
        }
        // Oldest served first; ids break ties.
        let mut order: Vec<(SimTime, CallId)> = self
            .calls
            .iter()
            .filter(|c| c.status == CallStatus::Served)
            .map(|c| (c.served_at.unwrap_or(SimTime::ZERO), c.id))
            .collect();
        order.sort_unstable();
        let drop: Vec<CallId> = order.into_iter().take(excess).map(|(_, id)| id).collect();
        self.calls.retain(|c| !(c.status == CallStatus::Served && drop.contains(&c.id)));
    }

    pub fn get(&self, id: CallId) -> Option<&Call> {
        self.calls.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter()
    }

    pub fn next_id(&self) -> CallId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.calls.iter().filter(|c| c.status == CallStatus::Pending).count()
    }

    pub fn live_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_live()).count()
    }
}
