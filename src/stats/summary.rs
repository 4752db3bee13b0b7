//! Attendance statistics over a slice of the ledger.
//!
//! This module provides the date-slice filter and the aggregate counters used
//! by the stats endpoint and the dashboard. Stale days (past dates still
//! `in-progress` or `pending`) are counted as absent at read time; nothing
//! here writes to the ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AttendanceRecord, AttendanceStatus, CorrectionStatus};
use crate::time::two_places;

/// Aggregate counters for a set of attendance records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AttendanceStats {
    /// Days classified present.
    pub present_days: u32,
    /// Days classified late.
    pub late_days: u32,
    /// Days marked absent, plus stale unfinished past days.
    pub absent_days: u32,
    /// Days classified half-day.
    pub half_days: u32,
    /// Today's unfinished days.
    pub in_progress_days: u32,
    /// Days classified invalid.
    pub invalid_days: u32,
    /// Days with a correction awaiting review.
    pub correction_days: u32,
    /// Number of records considered.
    pub total_days: u32,
    /// Sum of worked hours recomputed from clock times.
    pub total_hours: Decimal,
    /// `(present + late + half) / total × 100`, 2 decimal places.
    pub attendance_rate: Decimal,
}

/// Returns the records whose date lies in `[from, to]`.
///
/// Either bound may be omitted.
///
/// # Examples
///
/// ```
/// use attendance_engine::models::{AttendanceRecord, AttendanceStatus};
/// use attendance_engine::stats::filter_records;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let records: Vec<_> = (1..=5)
///     .map(|d| AttendanceRecord::without_times(day(d), AttendanceStatus::Absent, "Not recorded"))
///     .collect();
///
/// assert_eq!(filter_records(&records, Some(day(2)), Some(day(4))).len(), 3);
/// assert_eq!(filter_records(&records, None, Some(day(1))).len(), 1);
/// ```
pub fn filter_records(
    records: &[AttendanceRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&AttendanceRecord> {
    records
        .iter()
        .filter(|r| from.is_none_or(|from| r.date >= from))
        .filter(|r| to.is_none_or(|to| r.date <= to))
        .collect()
}

/// Status of `record` as seen on `today`.
///
/// A day before `today` that never reached a final classification is absent.
pub fn effective_status(record: &AttendanceRecord, today: NaiveDate) -> AttendanceStatus {
    if record.date < today && !record.status.is_terminal() {
        AttendanceStatus::Absent
    } else {
        record.status
    }
}

/// Computes attendance statistics.
///
/// # Arguments
///
/// * `records` - The records to aggregate, typically a [`filter_records`] slice
/// * `today` - The site-local current day, used to detect stale days
///
/// # Returns
///
/// Counters per status, the total of recomputed worked hours and the
/// attendance rate. The rate is zero when there are no records.
pub fn compute_stats<'a, I>(records: I, today: NaiveDate) -> AttendanceStats
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut stats = AttendanceStats::default();
    let mut total_hours = Decimal::ZERO;

    for record in records {
        stats.total_days += 1;
        total_hours += record.computed_hours();

        if record.correction_status == CorrectionStatus::Requested {
            stats.correction_days += 1;
        }

        match effective_status(record, today) {
            AttendanceStatus::Present => stats.present_days += 1,
            AttendanceStatus::Late => stats.late_days += 1,
            AttendanceStatus::HalfDay => stats.half_days += 1,
            AttendanceStatus::Invalid => stats.invalid_days += 1,
            AttendanceStatus::Absent => stats.absent_days += 1,
            AttendanceStatus::InProgress | AttendanceStatus::Pending => {
                stats.in_progress_days += 1
            }
        }
    }

    stats.total_hours = two_places(total_hours);
    stats.attendance_rate = if stats.total_days == 0 {
        two_places(Decimal::ZERO)
    } else {
        let attended = stats.present_days + stats.late_days + stats.half_days;
        two_places(Decimal::from(attended) * Decimal::ONE_HUNDRED / Decimal::from(stats.total_days))
    };

    stats
}
