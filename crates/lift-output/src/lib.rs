//! `lift-output` — CSV output for the lift simulation.
//!
//! | File                  | One row per                                  |
//! |-----------------------|----------------------------------------------|
//! | `notifications.csv`   | world notification (call, door, jam, ...)    |
//! | `tick_summaries.csv`  | every N-th tick, cabin state digest          |
//!
//! The writer implements [`OutputWriter`] and is driven by
//! [`SimOutputObserver`], which implements `lift_sim::WorldObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lift_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let output = Rc::new(RefCell::new(SimOutputObserver::new(writer, 20)));
//! world.subscribe(Rc::clone(&output));
//! world.run_steps(1_000);
//! output.borrow_mut().finish();
//! if let Some(e) = output.borrow_mut().take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{NotificationRow, TickRow};
pub use writer::OutputWriter;
