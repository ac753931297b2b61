//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `notifications.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{NotificationRow, OutputResult, TickRow};

pub const NOTIFICATIONS_FILE: &str = "notifications.csv";
pub const TICK_SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    notifications: Writer<File>,
    summaries:     Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut notifications = Writer::from_path(dir.join(NOTIFICATIONS_FILE))?;
        notifications.write_record(["time_ms", "kind", "floor", "detail"])?;

        let mut summaries = Writer::from_path(dir.join(TICK_SUMMARIES_FILE))?;
        summaries.write_record([
            "tick",
            "time_ms",
            "floor",
            "position_m",
            "velocity",
            "door_progress",
            "doors_open",
            "load_kg",
            "pending_calls",
        ])?;

        Ok(Self { notifications, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_notification(&mut self, row: &NotificationRow) -> OutputResult<()> {
        self.notifications.write_record(&[
            row.time_ms.to_string(),
            row.kind.to_owned(),
            row.floor.map(|f| f.to_string()).unwrap_or_default(),
            row.detail.clone(),
        ])?;
        Ok(())
    }

    fn write_tick(&mut self, row: &TickRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_ms.to_string(),
            row.floor.to_string(),
            format!("{:.3}", row.position_m),
            format!("{:.3}", row.velocity),
            format!("{:.3}", row.door_progress),
            (row.doors_open as u8).to_string(),
            format!("{:.1}", row.load_kg),
            row.pending_calls.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.notifications.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
