//! Core data models for the attendance engine.
//!
//! The [`Employee`] aggregate owns every ledger collection; planned shifts
//! live on their own and are referenced by id.

mod attendance;
mod correction;
mod employee;
mod leave;
mod review;
mod shift;

pub use attendance::{AttendanceRecord, AttendanceStatus, CorrectionStatus};
pub use correction::{CorrectionRequest, CorrectionType};
pub use employee::{Employee, EmployeeStatus};
pub use leave::{LeaveRequest, LeaveType};
pub use review::ReviewStatus;
pub use shift::{PlannedShift, ShiftStatus};
