//! The `OutputWriter` trait implemented by backend writers.

use crate::{NotificationRow, OutputResult, TickRow};

/// Trait implemented by output writers.
///
/// Errors are stored by the observer and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    fn write_notification(&mut self, row: &NotificationRow) -> OutputResult<()>;

    fn write_tick(&mut self, row: &TickRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
