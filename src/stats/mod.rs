//! Read-only attendance statistics.
//!
//! Everything here works on a snapshot of an employee's attendance ledger.

mod chart;
mod summary;

pub use chart::{ChartPoint, dashboard_chart};
pub use summary::{AttendanceStats, compute_stats, effective_status, filter_records};
