//! `SimOutputObserver<W>` — bridges `WorldObserver` to an `OutputWriter`.

use log::warn;

use lift_core::SimTime;
use lift_sim::{Notification, TickSummary, WorldObserver};

use crate::row::{NotificationRow, TickRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`WorldObserver`] that writes every notification, and a tick summary
/// every `summary_interval` ticks, to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because observer hooks
/// have no return value.  Check with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    summary_interval: u64,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `summary_interval` of 0 disables tick summaries.
    pub fn new(writer: W, summary_interval: u64) -> Self {
        Self { writer, summary_interval, last_error: None }
    }

    /// Flush the writer.  Call once the run is over.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> WorldObserver for SimOutputObserver<W> {
    fn on_notification(&mut self, at: SimTime, notification: &Notification) {
        let row = NotificationRow::new(at.0, notification);
        let result = self.writer.write_notification(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        if self.summary_interval == 0 || summary.tick.0 % self.summary_interval != 0 {
            return;
        }
        let result = self.writer.write_tick(&TickRow::from(summary));
        self.store_err(result);
    }
}
