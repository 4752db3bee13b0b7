//! Leave ledger: requests, review, cancellation and listing.
//!
//! No two non-rejected leaves of one employee may share a calendar day.
//! Days are counted in the site timezone and both ends are inclusive.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveRequest, LeaveType, ReviewStatus};
use crate::time;

/// Payload for a leave request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveInput {
    /// First leave day (`YYYY-MM-DD`).
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last leave day (`YYYY-MM-DD`).
    #[serde(default)]
    pub end_date: Option<String>,
    /// Kind of leave.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filters for [`list_leaves`]. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveFilter {
    /// Only this employee's leaves.
    pub employee_id: Option<String>,
    /// Only leaves in this status.
    pub status: Option<ReviewStatus>,
    /// Only leaves of this type.
    pub leave_type: Option<LeaveType>,
    /// Only leaves ending on or after this day.
    pub from: Option<NaiveDate>,
    /// Only leaves starting on or before this day.
    pub to: Option<NaiveDate>,
}

/// A leave together with the employee it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveListing {
    /// Owning employee.
    pub employee_id: String,
    /// Owning employee's name.
    pub employee_name: String,
    /// The leave itself.
    #[serde(flatten)]
    pub leave: LeaveRequest,
}

fn find_overlap(
    employee: &Employee,
    zone: Tz,
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<Uuid>,
) -> Option<&LeaveRequest> {
    employee.leaves.iter().find(|leave| {
        Some(leave.id) != exclude && leave.blocks_overlap() && leave.overlaps(zone, start, end)
    })
}

fn overlap_error(existing: &LeaveRequest, zone: Tz) -> EngineError {
    EngineError::OverlappingLeave {
        existing_id: existing.id.to_string(),
        existing_start: existing.first_day(zone),
        existing_end: existing.last_day(zone),
    }
}

/// Files a new pending leave.
pub fn request_leave(
    employee: &mut Employee,
    input: LeaveInput,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<LeaveRequest> {
    employee.ensure_active()?;

    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    let mut missing = Vec::new();
    if !present(&input.start_date) {
        missing.push("start_date");
    }
    if !present(&input.end_date) {
        missing.push("end_date");
    }
    if input.leave_type.is_none() {
        missing.push("leave_type");
    }

    let (Some(raw_start), Some(raw_end), Some(leave_type), true) = (
        input.start_date.as_deref(),
        input.end_date.as_deref(),
        input.leave_type,
        missing.is_empty(),
    ) else {
        return Err(EngineError::missing(missing));
    };

    let start = time::parse_date(raw_start.trim())?;
    let end = time::parse_date(raw_end.trim())?;
    if end < start {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    if start < site.today(now) {
        return Err(EngineError::PastDate { start });
    }

    let zone = site.timezone();
    if let Some(existing) = find_overlap(employee, zone, start, end, None) {
        return Err(overlap_error(existing, zone));
    }

    let leave = LeaveRequest {
        id: Uuid::new_v4(),
        start_date: time::start_of_day(start, zone)?,
        end_date: time::start_of_day(end, zone)?,
        leave_type,
        status: ReviewStatus::Pending,
        days: time::inclusive_days(start, end),
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };
    employee.leaves.push(leave.clone());

    Ok(leave)
}

/// Moves a leave to `status`.
///
/// Reviving a rejected leave re-checks it against the employee's other
/// non-rejected leaves.
pub fn update_leave_status(
    employee: &mut Employee,
    leave_id: Uuid,
    status: ReviewStatus,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<LeaveRequest> {
    let zone = site.timezone();
    let current = employee.leave(leave_id)?;

    if current.status == status {
        return Err(EngineError::NoChange {
            entity: "Leave".to_string(),
            id: leave_id.to_string(),
            status: status.to_string(),
        });
    }

    if current.status == ReviewStatus::Rejected {
        let (first, last) = (current.first_day(zone), current.last_day(zone));
        if let Some(existing) = find_overlap(employee, zone, first, last, Some(leave_id)) {
            return Err(overlap_error(existing, zone));
        }
    }

    let leave = employee.leave_mut(leave_id)?;
    leave.status = status;
    leave.updated_at = now;

    Ok(leave.clone())
}

/// Withdraws a pending leave that has not started yet.
pub fn cancel_leave(
    employee: &mut Employee,
    leave_id: Uuid,
    now: DateTime<Utc>,
) -> EngineResult<LeaveRequest> {
    let leave = employee.leave(leave_id)?;

    if leave.status != ReviewStatus::Pending {
        return Err(EngineError::NotPending {
            entity: "Leave".to_string(),
            id: leave_id.to_string(),
            status: leave.status.to_string(),
        });
    }
    if leave.start_date < now {
        return Err(EngineError::AlreadyStarted {
            leave_id: leave_id.to_string(),
        });
    }

    let index = employee
        .leaves
        .iter()
        .position(|l| l.id == leave_id)
        .ok_or_else(|| EngineError::LeaveNotFound {
            leave_id: leave_id.to_string(),
        })?;
    Ok(employee.leaves.remove(index))
}

/// Cross-employee leave listing, sorted by start.
pub fn list_leaves<'a, I>(employees: I, filter: &LeaveFilter, zone: Tz) -> Vec<LeaveListing>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut listings: Vec<LeaveListing> = employees
        .into_iter()
        .filter(|e| filter.employee_id.as_ref().is_none_or(|id| *id == e.id))
        .flat_map(|employee| {
            employee
                .leaves
                .iter()
                .filter(move |leave| filter.status.is_none_or(|s| leave.status == s))
                .filter(move |leave| filter.leave_type.is_none_or(|t| leave.leave_type == t))
                .filter(move |leave| filter.from.is_none_or(|from| leave.last_day(zone) >= from))
                .filter(move |leave| filter.to.is_none_or(|to| leave.first_day(zone) <= to))
                .map(move |leave| LeaveListing {
                    employee_id: employee.id.clone(),
                    employee_name: employee.name.clone(),
                    leave: leave.clone(),
                })
        })
        .collect();

    listings.sort_by(|a, b| {
        a.leave
            .start_date
            .cmp(&b.leave.start_date)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    listings
}
