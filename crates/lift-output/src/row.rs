//! Plain data row types written by output backends.

use lift_sim::{Notification, TickSummary};

/// One world notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRow {
    pub time_ms: u64,
    pub kind:    &'static str,
    /// Empty for notifications not tied to a floor.
    pub floor:   Option<u32>,
    /// Human-readable description.
    pub detail:  String,
}

impl NotificationRow {
    pub fn new(time_ms: u64, notification: &Notification) -> Self {
        Self {
            time_ms,
            kind:   notification.kind(),
            floor:  notification.floor(),
            detail: notification.to_string(),
        }
    }
}

/// Cabin state at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRow {
    pub tick:          u64,
    pub time_ms:       u64,
    pub floor:         u32,
    pub position_m:    f64,
    pub velocity:      f64,
    pub door_progress: f64,
    pub doors_open:    bool,
    pub load_kg:       f64,
    pub pending_calls: usize,
}

impl From<&TickSummary> for TickRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:          s.tick.0,
            time_ms:       s.at.0,
            floor:         s.floor,
            position_m:    s.position_m,
            velocity:      s.velocity,
            door_progress: s.door_progress,
            doors_open:    s.doors_open,
            load_kg:       s.load_kg,
            pending_calls: s.pending_calls,
        }
    }
}
