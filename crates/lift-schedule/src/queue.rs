//! `EventQueue` — sparse time-ordered event queue.
//!
//! Entries are grouped by fire time in a `BTreeMap`, so draining everything
//! due at `now` only touches the due prefix.  Entries sharing a fire time
//! keep their insertion order.

use std::collections::BTreeMap;

use lift_core::SimTime;

use crate::{EventKind, ScheduledEvent};

#[derive(Default, Clone, Debug)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, Vec<EventKind>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted entries, in any order.
    pub fn from_events<I: IntoIterator<Item = ScheduledEvent>>(events: I) -> Self {
        let mut queue = Self::new();
        for ev in events {
            queue.push(ev.fire_at, ev.kind);
        }
        queue
    }

    /// Schedule `kind` to fire at `at`.
    pub fn push(&mut self, at: SimTime, kind: EventKind) {
        self.inner.entry(at).or_default().push(kind);
        self.total += 1;
    }

    /// Remove and return every entry with `fire_at <= now`, earliest first.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            let (fire_at, kinds) = entry.remove_entry();
            self.total -= kinds.len();
            due.extend(kinds.into_iter().map(|kind| ScheduledEvent { fire_at, kind }));
        }
        due
    }

    /// The earliest queued fire time, or `None` if empty.
    pub fn next_fire(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// All queued entries in fire order, for snapshots and inspection.
    pub fn iter(&self) -> impl Iterator<Item = ScheduledEvent> + '_ {
        self.inner
            .iter()
            .flat_map(|(&fire_at, kinds)| kinds.iter().map(move |&kind| ScheduledEvent { fire_at, kind }))
    }
}
