//! Planned shifts.
//!
//! A [`PlannedShift`] is a schedule entry, not actual attendance. It is
//! stored on its own and referenced by id from the employee aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::two_places;

/// Lifecycle of a planned shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftStatus {
    /// Planned and not yet started.
    #[default]
    Scheduled,
    /// Currently being worked.
    InProgress,
    /// Finished.
    Completed,
    /// Called off.
    Cancelled,
}

impl ShiftStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::InProgress => "in-progress",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a shift in this status may move to `next`.
    ///
    /// ```
    /// use attendance_engine::models::ShiftStatus;
    ///
    /// assert!(ShiftStatus::Scheduled.can_transition_to(ShiftStatus::InProgress));
    /// assert!(!ShiftStatus::Completed.can_transition_to(ShiftStatus::Scheduled));
    /// ```
    pub fn can_transition_to(&self, next: ShiftStatus) -> bool {
        use ShiftStatus::*;
        match (*self, next) {
            (Scheduled, InProgress | Completed | Cancelled) => true,
            (InProgress, Completed | Cancelled) => true,
            (Completed | Cancelled, _) => false,
            (Scheduled, Scheduled) | (InProgress, Scheduled | InProgress) => false,
        }
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled shift for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedShift {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee who will work the shift.
    pub employee_id: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant, never before `start`.
    pub end: DateTime<Utc>,
    /// Where the shift takes place.
    #[serde(default)]
    pub location: Option<String>,
    /// Lifecycle status.
    pub status: ShiftStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the shift was created.
    pub created_at: DateTime<Utc>,
    /// When the shift last changed.
    pub updated_at: DateTime<Utc>,
}

impl PlannedShift {
    /// Planned length in hours, 2 decimal places.
    pub fn planned_hours(&self) -> Decimal {
        let minutes = (self.end - self.start).num_minutes();
        two_places(Decimal::new(minutes, 0) / Decimal::new(60, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_terminal_statuses_do_not_move() {
        for next in [
            ShiftStatus::Scheduled,
            ShiftStatus::InProgress,
            ShiftStatus::Completed,
            ShiftStatus::Cancelled,
        ] {
            assert!(!ShiftStatus::Completed.can_transition_to(next));
            assert!(!ShiftStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_in_progress_cannot_go_back() {
        assert!(!ShiftStatus::InProgress.can_transition_to(ShiftStatus::Scheduled));
        assert!(ShiftStatus::InProgress.can_transition_to(ShiftStatus::Cancelled));
    }

    #[test]
    fn test_planned_hours() {
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 22, 0, 0).unwrap();
        let shift = PlannedShift {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            start,
            end: Utc.with_ymd_and_hms(2026, 1, 11, 6, 30, 0).unwrap(),
            location: None,
            status: ShiftStatus::Scheduled,
            notes: None,
            created_at: start,
            updated_at: start,
        };
        assert_eq!(shift.planned_hours().to_string(), "8.50");
    }
}
