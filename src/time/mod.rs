//! Time arithmetic for the attendance engine.
//!
//! All classification happens in one fixed site timezone. This module parses
//! wall-clock strings, composes dates and times into instants, computes
//! overnight-aware durations and provides the [`Clock`] abstraction.

mod arithmetic;
mod clock;

pub use arithmetic::{
    combine, duration, duration_hours, inclusive_days, local_now, parse_date, parse_time, span,
    start_of_day, today, two_places,
};
pub use clock::{Clock, FixedClock, SystemClock};
