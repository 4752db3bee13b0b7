//! Error types for the attendance engine.
//!
//! Every failure the engine can report is a variant of [`EngineError`]. Each
//! variant carries a stable machine-readable code (see [`EngineError::code`])
//! and belongs to one [`ErrorKind`], which the HTTP layer maps onto a status
//! code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input the caller can fix.
    Validation,
    /// The request conflicts with the current state of a ledger.
    StateConflict,
    /// The referenced employee, record, leave or shift does not exist.
    NotFound,
    /// A business rule rejected an otherwise well-formed request.
    Policy,
    /// Persistence or configuration failure.
    Server,
}

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::AlreadyClockedIn {
///     date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
/// };
/// assert_eq!(error.code(), "ALREADY_CLOCKED_IN");
/// assert_eq!(error.kind(), ErrorKind::StateConflict);
/// assert_eq!(error.to_string(), "Already clocked in on 2026-03-02");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// One or more required fields were not supplied.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// Names of the missing fields.
        fields: Vec<String>,
    },

    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date format '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat {
        /// The rejected input.
        value: String,
    },

    /// A time string was not in `HH:mm` or `HH:mm:ss` form.
    #[error("Invalid time format '{value}', expected HH:mm or HH:mm:ss")]
    InvalidTimeFormat {
        /// The rejected input.
        value: String,
    },

    /// A local date and time does not exist in the site timezone.
    #[error("Local time {date} {time} does not exist in the site timezone")]
    NonexistentLocalTime {
        /// The calendar date.
        date: NaiveDate,
        /// The wall-clock time.
        time: String,
    },

    /// A leave ends before it starts.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A leave was requested for a day that has already passed.
    #[error("Start date {start} is in the past")]
    PastDate {
        /// The rejected start date.
        start: NaiveDate,
    },

    /// Clock-in was attempted without a location.
    #[error("Location is required to clock in")]
    LocationRequired,

    /// A planned shift ends before it starts.
    #[error("Shift start {start} is after shift end {end}")]
    InvalidChronology {
        /// Start instant (RFC 3339).
        start: String,
        /// End instant (RFC 3339).
        end: String,
    },

    /// Today's record already has a clock-in.
    #[error("Already clocked in on {date}")]
    AlreadyClockedIn {
        /// The attendance date.
        date: NaiveDate,
    },

    /// The open record already has a clock-out.
    #[error("Already clocked out on {date}")]
    AlreadyClockedOut {
        /// The attendance date.
        date: NaiveDate,
    },

    /// A non-rejected leave already covers part of the requested range.
    #[error("Leave overlaps existing leave {existing_id} ({existing_start} to {existing_end})")]
    OverlappingLeave {
        /// Id of the conflicting leave.
        existing_id: String,
        /// First day of the conflicting leave.
        existing_start: NaiveDate,
        /// Last day of the conflicting leave.
        existing_end: NaiveDate,
    },

    /// The leave or correction is no longer pending.
    #[error("{entity} '{id}' is not pending (current status: {status})")]
    NotPending {
        /// "Leave" or "Correction".
        entity: String,
        /// Id of the entity.
        id: String,
        /// Its current status.
        status: String,
    },

    /// The requested status equals the current status.
    #[error("{entity} '{id}' already has status {status}")]
    NoChange {
        /// Entity name.
        entity: String,
        /// Id of the entity.
        id: String,
        /// The unchanged status.
        status: String,
    },

    /// An employee with this id is already registered.
    #[error("Employee already exists: {employee_id}")]
    EmployeeExists {
        /// The duplicate id.
        employee_id: String,
    },

    /// A planned shift cannot move between the given statuses.
    #[error("Shift '{shift_id}' cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Id of the shift.
        shift_id: String,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The unknown id.
        employee_id: String,
    },

    /// No leave exists with the given id.
    #[error("Leave not found: {leave_id}")]
    LeaveNotFound {
        /// The unknown id.
        leave_id: String,
    },

    /// No planned shift exists with the given id.
    #[error("Shift not found: {shift_id}")]
    ShiftNotFound {
        /// The unknown id.
        shift_id: String,
    },

    /// No correction request exists with the given id.
    #[error("Correction request not found: {correction_id}")]
    CorrectionNotFound {
        /// The unknown id.
        correction_id: String,
    },

    /// Clock-out was attempted without an open record.
    #[error("No clock-in record found for {date}")]
    NoClockInRecord {
        /// The attendance date.
        date: NaiveDate,
    },

    /// A clock-in/out correction targets a day with no record.
    #[error("No attendance record exists for {date}")]
    NoAttendanceRecord {
        /// The attendance date.
        date: NaiveDate,
    },

    /// The previous shift ended too recently.
    #[error("Minimum gap between shifts is {required_hours} hours; {remaining_minutes} minutes remaining")]
    MinShiftInterval {
        /// Configured minimum gap.
        required_hours: i64,
        /// Minutes until clock-in becomes possible.
        remaining_minutes: i64,
    },

    /// Clock-out came too soon after clock-in.
    #[error("Minimum shift duration is {required_minutes} minutes; only {elapsed_minutes} elapsed")]
    MinShiftDuration {
        /// Configured minimum duration.
        required_minutes: i64,
        /// Minutes since clock-in.
        elapsed_minutes: i64,
    },

    /// The correction targets a day outside the trailing window.
    #[error("Corrections are only accepted for the last {window_days} days; {date} is too old")]
    CorrectionTooOld {
        /// The requested date.
        date: NaiveDate,
        /// Configured window.
        window_days: i64,
    },

    /// The correction targets a future day.
    #[error("Cannot request a correction for future date {date}")]
    FutureCorrection {
        /// The requested date.
        date: NaiveDate,
    },

    /// The leave has already begun and can no longer be cancelled.
    #[error("Leave '{leave_id}' has already started")]
    AlreadyStarted {
        /// Id of the leave.
        leave_id: String,
    },

    /// The employee is not active and cannot change their ledgers.
    #[error("Employee '{employee_id}' is {status}")]
    EmployeeInactive {
        /// Id of the employee.
        employee_id: String,
        /// Current employee status.
        status: String,
    },

    /// The persistence substrate failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::MissingFields`] from field names.
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineError::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            MissingFields { .. }
            | InvalidDateFormat { .. }
            | InvalidTimeFormat { .. }
            | NonexistentLocalTime { .. }
            | InvalidDateRange { .. }
            | PastDate { .. }
            | LocationRequired
            | InvalidChronology { .. } => ErrorKind::Validation,
            AlreadyClockedIn { .. }
            | AlreadyClockedOut { .. }
            | OverlappingLeave { .. }
            | NotPending { .. }
            | NoChange { .. }
            | EmployeeExists { .. }
            | InvalidStatusTransition { .. } => ErrorKind::StateConflict,
            EmployeeNotFound { .. }
            | LeaveNotFound { .. }
            | ShiftNotFound { .. }
            | CorrectionNotFound { .. }
            | NoClockInRecord { .. }
            | NoAttendanceRecord { .. } => ErrorKind::NotFound,
            MinShiftInterval { .. }
            | MinShiftDuration { .. }
            | CorrectionTooOld { .. }
            | FutureCorrection { .. }
            | AlreadyStarted { .. }
            | EmployeeInactive { .. } => ErrorKind::Policy,
            Storage { .. } | ConfigNotFound { .. } | ConfigParseError { .. } => ErrorKind::Server,
        }
    }

    /// Returns the stable code for this error.
    pub fn code(&self) -> &'static str {
        use EngineError::*;
        match self {
            MissingFields { .. } => "MISSING_FIELDS",
            InvalidDateFormat { .. } => "INVALID_DATE_FORMAT",
            InvalidTimeFormat { .. } => "INVALID_TIME_FORMAT",
            NonexistentLocalTime { .. } => "NONEXISTENT_LOCAL_TIME",
            InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            PastDate { .. } => "PAST_DATE",
            LocationRequired => "LOCATION_REQUIRED",
            InvalidChronology { .. } => "INVALID_CHRONOLOGY",
            AlreadyClockedIn { .. } => "ALREADY_CLOCKED_IN",
            AlreadyClockedOut { .. } => "ALREADY_CLOCKED_OUT",
            OverlappingLeave { .. } => "OVERLAPPING_LEAVE",
            NotPending { .. } => "NOT_PENDING",
            NoChange { .. } => "NO_CHANGE",
            EmployeeExists { .. } => "EMPLOYEE_EXISTS",
            InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            LeaveNotFound { .. } => "LEAVE_NOT_FOUND",
            ShiftNotFound { .. } => "SHIFT_NOT_FOUND",
            CorrectionNotFound { .. } => "CORRECTION_NOT_FOUND",
            NoClockInRecord { .. } => "NO_CLOCK_IN_RECORD",
            NoAttendanceRecord { .. } => "NO_ATTENDANCE_RECORD",
            MinShiftInterval { .. } => "MIN_SHIFT_INTERVAL",
            MinShiftDuration { .. } => "MIN_SHIFT_DURATION",
            CorrectionTooOld { .. } => "CORRECTION_TOO_OLD",
            FutureCorrection { .. } => "FUTURE_CORRECTION",
            AlreadyStarted { .. } => "ALREADY_STARTED",
            EmployeeInactive { .. } => "EMPLOYEE_INACTIVE",
            Storage { .. } => "SERVER_ERROR",
            ConfigNotFound { .. } | ConfigParseError { .. } => "CONFIG_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_fields_lists_every_field() {
        let error = EngineError::missing(["start_date", "leave_type"]);
        assert_eq!(
            error.to_string(),
            "Missing required fields: start_date, leave_type"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/site.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/site.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_overlapping_leave_is_state_conflict() {
        let error = EngineError::OverlappingLeave {
            existing_id: "abc".to_string(),
            existing_start: date(2026, 5, 1),
            existing_end: date(2026, 5, 3),
        };
        assert_eq!(error.kind(), ErrorKind::StateConflict);
        assert_eq!(error.code(), "OVERLAPPING_LEAVE");
        assert_eq!(
            error.to_string(),
            "Leave overlaps existing leave abc (2026-05-01 to 2026-05-03)"
        );
    }

    #[test]
    fn test_duplicate_employee_is_state_conflict() {
        let error = EngineError::EmployeeExists {
            employee_id: "emp_001".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::StateConflict);
        assert_eq!(error.code(), "EMPLOYEE_EXISTS");
    }

    #[test]
    fn test_policy_errors() {
        let interval = EngineError::MinShiftInterval {
            required_hours: 8,
            remaining_minutes: 90,
        };
        let duration = EngineError::MinShiftDuration {
            required_minutes: 30,
            elapsed_minutes: 12,
        };
        let too_old = EngineError::CorrectionTooOld {
            date: date(2026, 1, 1),
            window_days: 7,
        };
        let future = EngineError::FutureCorrection {
            date: date(2026, 1, 1),
        };

        for error in [interval, duration, too_old, future] {
            assert_eq!(error.kind(), ErrorKind::Policy, "{}", error);
        }
    }

    #[test]
    fn test_not_found_errors() {
        let error = EngineError::NoClockInRecord {
            date: date(2026, 2, 3),
        };
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.to_string(), "No clock-in record found for 2026-02-03");
    }

    #[test]
    fn test_storage_error_has_generic_code() {
        let error = EngineError::Storage {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.code(), "SERVER_ERROR");
        assert_eq!(error.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn fails() -> EngineResult<()> {
            Err(EngineError::LocationRequired)
        }

        fn propagates() -> EngineResult<()> {
            fails()?;
            Ok(())
        }

        assert_eq!(propagates(), Err(EngineError::LocationRequired));
    }
}
