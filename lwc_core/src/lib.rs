//! This crate turns Luxembourg's waste collection table into a browsable JSON document
//! and one iCalendar file per street.
//!
//! The table is the semicolon separated `calendrierdechet.csv` export with one row per
//! date, street and collection type.

pub use ical;

pub mod calendar;
pub mod emitter;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod pipeline;
pub mod reader;
pub mod weekday;
