//! Ledger transitions for the employee aggregate.
//!
//! This module contains the attendance state machine (clock-in, clock-out,
//! administrative override), the correction-request workflow and the leave
//! ledger. Every operation is a pure function over `&mut Employee`; callers
//! persist the aggregate only when the operation succeeds.

mod attendance;
mod correction;
mod leave;

pub use attendance::{
    AttendanceOverride, ClockInRequest, ClockOutRequest, classify_clock_in, classify_clock_out,
    clock_in, clock_out, override_attendance, today_record,
};
pub use correction::{CorrectionDecision, CorrectionInput, request_correction, review_correction};
pub use leave::{
    LeaveFilter, LeaveInput, LeaveListing, cancel_leave, list_leaves, request_leave,
    update_leave_status,
};
