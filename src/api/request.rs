//! Request types for the attendance API.
//!
//! Ledger payloads (`ClockInRequest`, `LeaveInput`, ...) are deserialized
//! directly. This module holds the HTTP-only bodies and query strings and
//! converts them into domain filters.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::ledger::{CorrectionDecision, LeaveFilter};
use crate::models::{Employee, EmployeeStatus, LeaveType, ReviewStatus, ShiftStatus};
use crate::scheduling::ShiftQuery;
use crate::time::parse_date;

fn optional_date(value: Option<&str>) -> EngineResult<Option<chrono::NaiveDate>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_date)
        .transpose()
}

/// Body for registering an employee.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterEmployeeRequest {
    /// Unique identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Employment status; defaults to active.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

impl TryFrom<RegisterEmployeeRequest> for Employee {
    type Error = EngineError;

    fn try_from(req: RegisterEmployeeRequest) -> EngineResult<Self> {
        let id = req
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EngineError::missing(["id"]))?;
        let mut employee = Employee::new(id, req.name.unwrap_or_default());
        employee.status = req.status.unwrap_or_default();
        Ok(employee)
    }
}

/// Query string for the stats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    /// First day of the slice (`YYYY-MM-DD`).
    #[serde(default)]
    pub from: Option<String>,
    /// Last day of the slice (`YYYY-MM-DD`).
    #[serde(default)]
    pub to: Option<String>,
}

impl StatsQuery {
    /// Parses both bounds.
    pub fn bounds(&self) -> EngineResult<(Option<chrono::NaiveDate>, Option<chrono::NaiveDate>)> {
        Ok((
            optional_date(self.from.as_deref())?,
            optional_date(self.to.as_deref())?,
        ))
    }
}

/// Body for a leave status change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveStatusRequest {
    /// New status.
    #[serde(default)]
    pub status: Option<ReviewStatus>,
}

/// Body for a correction review.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorrectionReviewRequest {
    /// Approve or reject.
    #[serde(default)]
    pub decision: Option<CorrectionDecision>,
    /// Reviewer's note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Query string for the leave listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveListQuery {
    /// Only this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only this status.
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    /// Only this leave type.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
    /// Window start (`YYYY-MM-DD`).
    #[serde(default)]
    pub from: Option<String>,
    /// Window end (`YYYY-MM-DD`).
    #[serde(default)]
    pub to: Option<String>,
}

impl TryFrom<LeaveListQuery> for LeaveFilter {
    type Error = EngineError;

    fn try_from(query: LeaveListQuery) -> EngineResult<Self> {
        Ok(LeaveFilter {
            from: optional_date(query.from.as_deref())?,
            to: optional_date(query.to.as_deref())?,
            employee_id: query.employee_id,
            status: query.status,
            leave_type: query.leave_type,
        })
    }
}

/// Query string for the shift listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftListQuery {
    /// Only this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only this status.
    #[serde(default)]
    pub status: Option<ShiftStatus>,
    /// Window start (`YYYY-MM-DD`).
    #[serde(default)]
    pub from: Option<String>,
    /// Window end (`YYYY-MM-DD`).
    #[serde(default)]
    pub to: Option<String>,
}

impl TryFrom<ShiftListQuery> for ShiftQuery {
    type Error = EngineError;

    fn try_from(query: ShiftListQuery) -> EngineResult<Self> {
        Ok(ShiftQuery {
            from: optional_date(query.from.as_deref())?,
            to: optional_date(query.to.as_deref())?,
            employee_id: query.employee_id,
            status: query.status,
        })
    }
}
