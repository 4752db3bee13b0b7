//! Daily attendance records.
//!
//! One [`AttendanceRecord`] exists per employee per site-local calendar day.
//! Absence is implicit: a day without a record is never materialized by the
//! clock-in/clock-out state machine.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time;

/// Classification of an attendance day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Clocked in, not yet clocked out.
    InProgress,
    /// Completed a full day.
    Present,
    /// Clocked in after the late threshold.
    Late,
    /// Worked less than a full day.
    HalfDay,
    /// Clock-out produced no worked time.
    Invalid,
    /// Explicitly recorded absence.
    Absent,
    /// Placeholder awaiting a correction review.
    Pending,
}

impl AttendanceStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::InProgress => "in-progress",
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half-day",
            AttendanceStatus::Invalid => "invalid",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Pending => "pending",
        }
    }

    /// Whether the day has reached a final classification.
    ///
    /// ```
    /// use attendance_engine::models::AttendanceStatus;
    ///
    /// assert!(AttendanceStatus::HalfDay.is_terminal());
    /// assert!(!AttendanceStatus::InProgress.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        match self {
            AttendanceStatus::Present
            | AttendanceStatus::Late
            | AttendanceStatus::HalfDay
            | AttendanceStatus::Invalid
            | AttendanceStatus::Absent => true,
            AttendanceStatus::InProgress | AttendanceStatus::Pending => false,
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record stands in the correction workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    /// No correction has been requested.
    #[default]
    None,
    /// A correction is awaiting review.
    Requested,
    /// The last correction was approved.
    Approved,
    /// The last correction was rejected.
    Rejected,
}

/// A single day in an employee's attendance ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Site-local calendar day.
    pub date: NaiveDate,
    /// Site-local clock-in time.
    pub clock_in: Option<NaiveTime>,
    /// Site-local clock-out time; earlier than `clock_in` means overnight.
    pub clock_out: Option<NaiveTime>,
    /// Classification of the day.
    pub status: AttendanceStatus,
    /// Worked hours, 2 decimal places.
    pub hours_worked: Decimal,
    /// Where the employee clocked in.
    pub location: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Correction workflow marker.
    #[serde(default)]
    pub correction_status: CorrectionStatus,
}

impl AttendanceRecord {
    /// Creates a record for a fresh clock-in.
    pub fn clocked_in(
        date: NaiveDate,
        clock_in: NaiveTime,
        status: AttendanceStatus,
        location: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            date,
            clock_in: Some(clock_in),
            clock_out: None,
            status,
            hours_worked: Decimal::ZERO,
            location: location.into(),
            notes,
            correction_status: CorrectionStatus::None,
        }
    }

    /// Creates a time-less record with the given status.
    pub fn without_times(
        date: NaiveDate,
        status: AttendanceStatus,
        location: impl Into<String>,
    ) -> Self {
        Self {
            date,
            clock_in: None,
            clock_out: None,
            status,
            hours_worked: Decimal::ZERO,
            location: location.into(),
            notes: None,
            correction_status: CorrectionStatus::None,
        }
    }

    /// True when clocked in but not yet out.
    pub fn is_open(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    /// Overnight-aware span between clock-in and clock-out.
    pub fn worked_span(&self) -> Option<Duration> {
        match (self.clock_in, self.clock_out) {
            (Some(clock_in), Some(clock_out)) => Some(time::span(clock_in, clock_out)),
            _ => None,
        }
    }

    /// Hours recomputed from the stored times (zero unless both are set).
    pub fn computed_hours(&self) -> Decimal {
        match (self.clock_in, self.clock_out) {
            (Some(clock_in), Some(clock_out)) => time::duration_hours(clock_in, clock_out),
            _ => Decimal::ZERO,
        }
    }

    /// Refreshes `hours_worked` from the stored times.
    pub fn recompute_hours(&mut self) -> Decimal {
        self.hours_worked = self.computed_hours();
        self.hours_worked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half-day\""
        );
        assert_eq!(AttendanceStatus::Late.to_string(), "late");
    }

    #[test]
    fn test_record_serializes_persisted_layout() {
        let mut record =
            AttendanceRecord::clocked_in(day(), t(9, 0), AttendanceStatus::InProgress, "Front desk", None);
        record.clock_out = Some(t(17, 0));
        record.recompute_hours();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2026-03-02");
        assert_eq!(json["clock_in"], "09:00:00");
        assert_eq!(json["clock_out"], "17:00:00");
        assert_eq!(json["hours_worked"], "8.00");
        assert_eq!(json["correction_status"], "none");
    }

    #[test]
    fn test_open_record() {
        let record =
            AttendanceRecord::clocked_in(day(), t(9, 0), AttendanceStatus::InProgress, "Front desk", None);
        assert!(record.is_open());
        assert_eq!(record.computed_hours(), Decimal::ZERO);
        assert!(record.worked_span().is_none());
    }

    #[test]
    fn test_overnight_hours() {
        let mut record =
            AttendanceRecord::clocked_in(day(), t(22, 0), AttendanceStatus::InProgress, "Kitchen", None);
        record.clock_out = Some(t(6, 30));
        assert_eq!(record.recompute_hours(), Decimal::new(850, 2));
        assert_eq!(record.worked_span(), Some(Duration::minutes(510)));
    }

    #[test]
    fn test_placeholder_has_no_times() {
        let record = AttendanceRecord::without_times(day(), AttendanceStatus::Pending, "Not recorded");
        assert!(!record.is_open());
        assert_eq!(record.hours_worked, Decimal::ZERO);
        assert_eq!(record.correction_status, CorrectionStatus::None);
    }
}
