//! The employee aggregate.
//!
//! An [`Employee`] owns its attendance ledger, leave ledger, correction
//! requests and planned-shift references. Those collections change only
//! through the ledger functions, which take the aggregate by `&mut`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::attendance::AttendanceRecord;
use super::correction::CorrectionRequest;
use super::leave::LeaveRequest;

/// Employment status as supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed.
    #[default]
    Active,
    /// Suspended or otherwise not working.
    Inactive,
    /// No longer employed.
    Terminated,
}

impl EmployeeStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

/// An employee and the ledgers it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Employment status.
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Attendance ledger, kept sorted by date.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Leave ledger.
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    /// Correction requests.
    #[serde(default)]
    pub correction_requests: Vec<CorrectionRequest>,
    /// Ids of planned shifts.
    #[serde(default)]
    pub planned_shifts: Vec<Uuid>,
}

impl Employee {
    /// Creates an active employee with empty ledgers.
    ///
    /// ```
    /// use attendance_engine::models::Employee;
    ///
    /// let employee = Employee::new("emp_001", "Asha Rao");
    /// assert!(employee.is_active());
    /// assert!(employee.attendance.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: EmployeeStatus::Active,
            attendance: Vec::new(),
            leaves: Vec::new(),
            correction_requests: Vec::new(),
            planned_shifts: Vec::new(),
        }
    }

    /// Whether the employee may change their ledgers.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Fails `EmployeeInactive` unless the employee is active.
    pub fn ensure_active(&self) -> EngineResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(EngineError::EmployeeInactive {
                employee_id: self.id.clone(),
                status: self.status.as_str().to_string(),
            })
        }
    }

    fn attendance_index(&self, date: NaiveDate) -> Result<usize, usize> {
        self.attendance.binary_search_by_key(&date, |r| r.date)
    }

    /// The record for `date`, if any.
    pub fn attendance_on(&self, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.attendance_index(date).ok().map(|i| &self.attendance[i])
    }

    /// Mutable access to the record for `date`, if any.
    pub fn attendance_on_mut(&mut self, date: NaiveDate) -> Option<&mut AttendanceRecord> {
        match self.attendance_index(date) {
            Ok(i) => Some(&mut self.attendance[i]),
            Err(_) => None,
        }
    }

    /// Inserts `record`, replacing any existing record for the same date.
    pub fn put_attendance(&mut self, record: AttendanceRecord) -> &mut AttendanceRecord {
        let index = match self.attendance_index(record.date) {
            Ok(i) => {
                self.attendance[i] = record;
                i
            }
            Err(i) => {
                self.attendance.insert(i, record);
                i
            }
        };
        &mut self.attendance[index]
    }

    /// Looks up a leave by id.
    pub fn leave(&self, id: Uuid) -> EngineResult<&LeaveRequest> {
        self.leaves
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::LeaveNotFound {
                leave_id: id.to_string(),
            })
    }

    /// Looks up a leave by id for mutation.
    pub fn leave_mut(&mut self, id: Uuid) -> EngineResult<&mut LeaveRequest> {
        self.leaves
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::LeaveNotFound {
                leave_id: id.to_string(),
            })
    }

    /// Looks up a correction request by id for mutation.
    pub fn correction_mut(&mut self, id: Uuid) -> EngineResult<&mut CorrectionRequest> {
        self.correction_requests
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::CorrectionNotFound {
                correction_id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_deserialize_identity_only() {
        let json = r#"{ "id": "emp_001", "status": "inactive" }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();

        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.status, EmployeeStatus::Inactive);
        assert!(employee.leaves.is_empty());
        assert!(employee.planned_shifts.is_empty());
    }

    #[test]
    fn test_ensure_active() {
        let mut employee = Employee::new("emp_001", "Asha");
        assert!(employee.ensure_active().is_ok());

        employee.status = EmployeeStatus::Terminated;
        match employee.ensure_active() {
            Err(EngineError::EmployeeInactive { status, .. }) => assert_eq!(status, "terminated"),
            other => panic!("Expected EmployeeInactive, got {:?}", other),
        }
    }

    #[test]
    fn test_attendance_stays_sorted_and_unique() {
        let mut employee = Employee::new("emp_001", "Asha");
        for d in [5, 2, 9, 2] {
            employee.put_attendance(AttendanceRecord::without_times(
                day(d),
                AttendanceStatus::Absent,
                "Not recorded",
            ));
        }

        let dates: Vec<_> = employee.attendance.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2), day(5), day(9)]);
        assert!(employee.attendance_on(day(5)).is_some());
        assert!(employee.attendance_on(day(6)).is_none());
    }

    #[test]
    fn test_unknown_leave_is_not_found() {
        let employee = Employee::new("emp_001", "Asha");
        assert!(matches!(
            employee.leave(Uuid::new_v4()),
            Err(EngineError::LeaveNotFound { .. })
        ));
    }
}
