//! Leave requests.
//!
//! Leave boundaries are persisted as absolute instants marking the site-local
//! start of the first and last leave day. Overlap and day counting work on
//! the calendar days those instants fall on in the site timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::review::ReviewStatus;

/// Kind of leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Unpaid leave.
    Unpaid,
    /// Anything else.
    Other,
}

impl LeaveType {
    /// Returns the wire name of the leave type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Casual => "casual",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Other => "other",
        }
    }
}

/// A leave interval in an employee's leave ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// Start of the first leave day.
    pub start_date: DateTime<Utc>,
    /// Start of the last leave day.
    pub end_date: DateTime<Utc>,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// Review status.
    pub status: ReviewStatus,
    /// Inclusive number of calendar days.
    pub days: i64,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request last changed.
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// First leave day in the site timezone.
    pub fn first_day(&self, zone: Tz) -> NaiveDate {
        self.start_date.with_timezone(&zone).date_naive()
    }

    /// Last leave day in the site timezone.
    pub fn last_day(&self, zone: Tz) -> NaiveDate {
        self.end_date.with_timezone(&zone).date_naive()
    }

    /// Whether this leave blocks others from overlapping it.
    pub fn blocks_overlap(&self) -> bool {
        self.status != ReviewStatus::Rejected
    }

    /// Inclusive day-granularity intersection with `[start, end]`.
    ///
    /// ```
    /// use attendance_engine::models::{LeaveRequest, LeaveType, ReviewStatus};
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use chrono_tz::Tz;
    ///
    /// let leave = LeaveRequest {
    ///     id: uuid::Uuid::new_v4(),
    ///     start_date: Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap(),
    ///     end_date: Utc.with_ymd_and_hms(2026, 5, 6, 0, 0, 0).unwrap(),
    ///     leave_type: LeaveType::Annual,
    ///     status: ReviewStatus::Pending,
    ///     days: 3,
    ///     notes: None,
    ///     created_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
    ///     updated_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
    /// };
    /// let day = |d| NaiveDate::from_ymd_opt(2026, 5, d).unwrap();
    /// assert!(leave.overlaps(Tz::UTC, day(6), day(9)));
    /// assert!(!leave.overlaps(Tz::UTC, day(7), day(9)));
    /// ```
    pub fn overlaps(&self, zone: Tz, start: NaiveDate, end: NaiveDate) -> bool {
        self.first_day(zone) <= end && start <= self.last_day(zone)
    }
}
