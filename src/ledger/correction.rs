//! Correction requests and their review.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, CorrectionRequest, CorrectionStatus, CorrectionType,
    Employee, ReviewStatus,
};
use crate::time;

use super::attendance::reclassify;

/// Payload for a correction request. Every field is optional on the wire so
/// missing ones can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorrectionInput {
    /// Day to correct (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: Option<String>,
    /// What to correct.
    #[serde(default)]
    pub correction_type: Option<CorrectionType>,
    /// Replacement time (`HH:mm[:ss]`), required for clock-in/clock-out.
    #[serde(default)]
    pub requested_time: Option<String>,
    /// Why the correction is needed.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of a correction review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionDecision {
    /// Apply the correction.
    Approve,
    /// Leave the record as it is.
    Reject,
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Files a correction against one of the last `window_days` days.
pub fn request_correction(
    employee: &mut Employee,
    input: CorrectionInput,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<CorrectionRequest> {
    employee.ensure_active()?;

    let mut missing = Vec::new();
    if blank(&input.date) {
        missing.push("date");
    }
    if input.correction_type.is_none() {
        missing.push("correction_type");
    }
    if blank(&input.reason) {
        missing.push("reason");
    }
    if input.correction_type.is_some_and(|t| t.needs_time()) && blank(&input.requested_time) {
        missing.push("requested_time");
    }

    let (Some(raw_date), Some(correction_type), Some(reason), true) = (
        input.date.as_deref(),
        input.correction_type,
        input.reason,
        missing.is_empty(),
    ) else {
        return Err(EngineError::missing(missing));
    };

    let date = time::parse_date(raw_date.trim())?;
    let requested_time = input
        .requested_time
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| time::parse_time(t.trim()))
        .transpose()?;

    let today = site.today(now);
    let days_back = (today - date).num_days();
    if days_back < 0 {
        return Err(EngineError::FutureCorrection { date });
    }
    if days_back > site.corrections.window_days {
        return Err(EngineError::CorrectionTooOld {
            date,
            window_days: site.corrections.window_days,
        });
    }

    match employee.attendance_on_mut(date) {
        Some(record) => record.correction_status = CorrectionStatus::Requested,
        None if correction_type == CorrectionType::Absence => {
            let mut placeholder = AttendanceRecord::without_times(
                date,
                AttendanceStatus::Pending,
                site.attendance.unrecorded_location.clone(),
            );
            placeholder.correction_status = CorrectionStatus::Requested;
            employee.put_attendance(placeholder);
        }
        None => return Err(EngineError::NoAttendanceRecord { date }),
    }

    let request = CorrectionRequest {
        id: Uuid::new_v4(),
        date,
        correction_type,
        requested_time,
        reason: reason.trim().to_string(),
        status: ReviewStatus::Pending,
        review_note: None,
        created_at: now,
        reviewed_at: None,
    };
    employee.correction_requests.push(request.clone());

    Ok(request)
}

/// Approves or rejects a pending correction.
///
/// Approval writes the requested time into the record and re-derives hours
/// and status; an approved absence marks the day absent with zero hours.
pub fn review_correction(
    employee: &mut Employee,
    correction_id: Uuid,
    decision: CorrectionDecision,
    note: Option<String>,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<CorrectionRequest> {
    let pending = employee.correction_mut(correction_id)?;
    if pending.status != ReviewStatus::Pending {
        return Err(EngineError::NotPending {
            entity: "Correction".to_string(),
            id: correction_id.to_string(),
            status: pending.status.to_string(),
        });
    }
    let (date, correction_type, requested_time) =
        (pending.date, pending.correction_type, pending.requested_time);

    let outcome = match decision {
        CorrectionDecision::Approve => {
            if employee.attendance_on(date).is_none() {
                employee.put_attendance(AttendanceRecord::without_times(
                    date,
                    AttendanceStatus::Pending,
                    site.attendance.unrecorded_location.clone(),
                ));
            }
            let record = employee
                .attendance_on_mut(date)
                .ok_or(EngineError::NoAttendanceRecord { date })?;

            match correction_type {
                CorrectionType::ClockIn => {
                    record.clock_in = requested_time.or(record.clock_in);
                    reclassify(record, &site.attendance);
                }
                CorrectionType::ClockOut => {
                    record.clock_out = requested_time.or(record.clock_out);
                    reclassify(record, &site.attendance);
                }
                CorrectionType::Absence => {
                    record.status = AttendanceStatus::Absent;
                    record.hours_worked = Decimal::ZERO;
                }
            }
            record.correction_status = CorrectionStatus::Approved;
            ReviewStatus::Approved
        }
        CorrectionDecision::Reject => {
            if let Some(record) = employee.attendance_on_mut(date) {
                record.correction_status = CorrectionStatus::Rejected;
            }
            ReviewStatus::Rejected
        }
    };

    let request = employee.correction_mut(correction_id)?;
    request.status = outcome;
    request.review_note = note;
    request.reviewed_at = Some(now);
    let reviewed = request.clone();

    // Another pending correction for the same day keeps it flagged.
    let still_requested = employee
        .correction_requests
        .iter()
        .any(|c| c.id != correction_id && c.date == date && c.status == ReviewStatus::Pending);
    if still_requested {
        if let Some(record) = employee.attendance_on_mut(date) {
            record.correction_status = CorrectionStatus::Requested;
        }
    }

    Ok(reviewed)
}
