//! Core types and engines for recurcal.
//!
//! This crate provides everything the calendar application layer needs to turn
//! an event draft into concrete calendar instances:
//! - `event` for the draft, persisted event and recurrence rule shapes
//! - `time_validation` for the start/end time check that gates creation
//! - `recurrence` for expanding a rule into dates and instances
//! - `detach` for taking a single occurrence out of its series
//! - `series` for composing the above the way a caller persists events

pub mod config;
pub mod detach;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod series;
pub mod time_validation;

// Re-export the data model at crate root for convenience
pub use event::*;
