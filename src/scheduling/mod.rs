//! Shift scheduling.
//!
//! Planned shifts are schedule entries, separate from actual attendance.
//! They are stored by the shift repository and referenced by id from the
//! employee aggregate.

mod planner;

pub use planner::{
    ShiftInput, ShiftPatch, ShiftQuery, apply_patch, attach, build_shift, detach, query_shifts,
};
