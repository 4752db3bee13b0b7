//! Clock-in / clock-out state machine.
//!
//! Per employee and site-local day the ledger moves
//! `absent → in-progress → {present | late | half-day | invalid}`. The
//! `absent` state is implicit: no record is written for it here.
//!
//! Every function in this module is a pure transition over `&mut Employee`.
//! Callers serialize access per employee and persist the aggregate only when
//! the transition returns `Ok`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::{AttendancePolicy, SiteConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, Employee};
use crate::time;

/// Payload for a clock-in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockInRequest {
    /// Where the employee is clocking in. Required.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for a clock-out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockOutRequest {
    /// Optional notes, replacing any existing notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Administrative changes to a single day. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceOverride {
    /// New status, applied verbatim.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New clock-in time (`HH:mm[:ss]`).
    #[serde(default)]
    pub clock_in: Option<String>,
    /// New clock-out time (`HH:mm[:ss]`).
    #[serde(default)]
    pub clock_out: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Status for a clock-in at `local_time`.
pub fn classify_clock_in(local_time: NaiveTime, policy: &AttendancePolicy) -> AttendanceStatus {
    if local_time > policy.late_threshold {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::InProgress
    }
}

/// Status after a clock-out yielding `hours` on a day currently `current`.
///
/// # Example
///
/// ```
/// use attendance_engine::config::AttendancePolicy;
/// use attendance_engine::ledger::classify_clock_out;
/// use attendance_engine::models::AttendanceStatus;
/// use rust_decimal::Decimal;
///
/// let policy = AttendancePolicy::default();
/// let status = classify_clock_out(AttendanceStatus::InProgress, Decimal::new(8, 0), &policy);
/// assert_eq!(status, AttendanceStatus::Present);
///
/// let status = classify_clock_out(AttendanceStatus::Late, Decimal::new(8, 0), &policy);
/// assert_eq!(status, AttendanceStatus::Late);
///
/// let status = classify_clock_out(AttendanceStatus::InProgress, Decimal::new(35, 1), &policy);
/// assert_eq!(status, AttendanceStatus::HalfDay);
/// ```
pub fn classify_clock_out(
    current: AttendanceStatus,
    hours: Decimal,
    policy: &AttendancePolicy,
) -> AttendanceStatus {
    if hours >= policy.full_day_hours {
        match current {
            AttendanceStatus::Late => AttendanceStatus::Late,
            _ => AttendanceStatus::Present,
        }
    } else if hours > Decimal::ZERO {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Invalid
    }
}

/// Re-derives hours and status from a record's times.
///
/// Lateness comes from the clock-in time. Records without a clock-in keep
/// their status.
pub(crate) fn reclassify(record: &mut AttendanceRecord, policy: &AttendancePolicy) {
    let Some(clock_in) = record.clock_in else {
        record.recompute_hours();
        return;
    };

    let opening = classify_clock_in(clock_in, policy);
    let hours = record.recompute_hours();
    record.status = if record.clock_out.is_some() {
        classify_clock_out(opening, hours, policy)
    } else {
        opening
    };
}

/// Instant at which the shift recorded in `record` ended, if it did.
fn shift_end(record: &AttendanceRecord, site: &SiteConfig) -> EngineResult<Option<DateTime<Utc>>> {
    let Some(clock_out) = record.clock_out else {
        return Ok(None);
    };

    let overnight = record.clock_in.is_some_and(|clock_in| clock_out < clock_in);
    let end_date = if overnight {
        record.date.succ_opt().unwrap_or(record.date)
    } else {
        record.date
    };

    time::combine(end_date, clock_out, site.timezone()).map(Some)
}

/// Records a clock-in for today.
///
/// Fails `LocationRequired`, `AlreadyClockedIn` or `MinShiftInterval`.
pub fn clock_in(
    employee: &mut Employee,
    request: ClockInRequest,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<AttendanceRecord> {
    employee.ensure_active()?;

    let location = request
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .ok_or(EngineError::LocationRequired)?;

    let local = site.local_now(now);
    let today = local.date();
    let clock_in_time = local.time();
    let policy = &site.attendance;

    if let Some(existing) = employee.attendance_on(today) {
        if existing.clock_in.is_some() {
            return Err(EngineError::AlreadyClockedIn { date: today });
        }
    }

    let mut last_end: Option<DateTime<Utc>> = None;
    for record in &employee.attendance {
        if let Some(end) = shift_end(record, site)? {
            last_end = Some(last_end.map_or(end, |latest| latest.max(end)));
        }
    }

    if let Some(end) = last_end {
        let required = Duration::hours(policy.min_shift_gap_hours);
        let elapsed = now - end;
        if elapsed < required {
            let remaining = required - elapsed;
            // Round up so "0 minutes remaining" never accompanies a rejection.
            let remaining_minutes = (remaining.num_seconds() + 59) / 60;
            return Err(EngineError::MinShiftInterval {
                required_hours: policy.min_shift_gap_hours,
                remaining_minutes,
            });
        }
    }

    let status = classify_clock_in(clock_in_time, policy);

    let record = match employee.attendance_on_mut(today) {
        Some(placeholder) => {
            placeholder.clock_in = Some(clock_in_time);
            placeholder.status = status;
            placeholder.location = location;
            if request.notes.is_some() {
                placeholder.notes = request.notes;
            }
            placeholder.clone()
        }
        None => employee
            .put_attendance(AttendanceRecord::clocked_in(
                today,
                clock_in_time,
                status,
                location,
                request.notes,
            ))
            .clone(),
    };

    Ok(record)
}

/// Picks the record a clock-out applies to: today's, or yesterday's if it is
/// still open and less than a day old.
fn open_record_date(
    employee: &Employee,
    today: NaiveDate,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<NaiveDate> {
    if let Some(record) = employee.attendance_on(today) {
        if record.clock_in.is_some() {
            return Ok(today);
        }
    }

    if let Some(yesterday) = today.pred_opt() {
        if let Some(record) = employee.attendance_on(yesterday) {
            if let (true, Some(clock_in)) = (record.is_open(), record.clock_in) {
                let started = time::combine(yesterday, clock_in, site.timezone())?;
                if now - started < Duration::hours(24) {
                    return Ok(yesterday);
                }
            }
        }
    }

    Err(EngineError::NoClockInRecord { date: today })
}

/// Closes the open record, computing hours and the final status.
///
/// Fails `NoClockInRecord`, `AlreadyClockedOut` or `MinShiftDuration`.
pub fn clock_out(
    employee: &mut Employee,
    request: ClockOutRequest,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<AttendanceRecord> {
    employee.ensure_active()?;

    let local = site.local_now(now);
    let today = local.date();
    let clock_out_time = local.time();
    let policy = &site.attendance;

    let date = open_record_date(employee, today, now, site)?;
    let record = employee
        .attendance_on_mut(date)
        .ok_or(EngineError::NoClockInRecord { date: today })?;

    if record.clock_out.is_some() {
        return Err(EngineError::AlreadyClockedOut { date });
    }
    let clock_in = record
        .clock_in
        .ok_or(EngineError::NoClockInRecord { date: today })?;

    let started = time::combine(date, clock_in, site.timezone())?;
    let elapsed_minutes = (now - started).num_minutes();
    if elapsed_minutes < policy.min_shift_minutes {
        return Err(EngineError::MinShiftDuration {
            required_minutes: policy.min_shift_minutes,
            elapsed_minutes,
        });
    }

    record.clock_out = Some(clock_out_time);
    let hours = record.recompute_hours();
    record.status = classify_clock_out(record.status, hours, policy);
    if request.notes.is_some() {
        record.notes = request.notes;
    }

    Ok(record.clone())
}

/// Applies an administrative override to the record for `date`.
///
/// Always permitted. Creates the record if the day has none. When both times
/// end up set, hours are recomputed; the status is never re-derived.
pub fn override_attendance(
    employee: &mut Employee,
    date: NaiveDate,
    changes: AttendanceOverride,
    site: &SiteConfig,
) -> EngineResult<AttendanceRecord> {
    let clock_in = changes.clock_in.as_deref().map(time::parse_time).transpose()?;
    let clock_out = changes.clock_out.as_deref().map(time::parse_time).transpose()?;

    if employee.attendance_on(date).is_none() {
        employee.put_attendance(AttendanceRecord::without_times(
            date,
            changes.status.unwrap_or(AttendanceStatus::Absent),
            site.attendance.unrecorded_location.clone(),
        ));
    }
    let record = employee
        .attendance_on_mut(date)
        .ok_or(EngineError::NoAttendanceRecord { date })?;

    if clock_in.is_some() {
        record.clock_in = clock_in;
    }
    if clock_out.is_some() {
        record.clock_out = clock_out;
    }
    if let Some(location) = changes.location {
        record.location = location;
    }
    if changes.notes.is_some() {
        record.notes = changes.notes;
    }

    if let Some(status) = changes.status {
        record.status = status;
    }
    if record.clock_in.is_some() && record.clock_out.is_some() {
        record.recompute_hours();
    }

    Ok(record.clone())
}

/// Today's record, if the employee has one.
pub fn today_record(
    employee: &Employee,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> Option<AttendanceRecord> {
    employee.attendance_on(site.today(now)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectionStatus, EmployeeStatus};
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at_desk() -> ClockInRequest {
        ClockInRequest {
            location: Some("Front desk".to_string()),
            notes: None,
        }
    }

    fn employee() -> Employee {
        Employee::new("emp_001", "Asha Rao")
    }

    #[test]
    fn test_full_day_is_present_with_eight_hours() {
        let mut emp = employee();
        let record = clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::InProgress);
        assert_eq!(record.clock_in, Some(t(9, 0)));

        let record = clock_out(&mut emp, ClockOutRequest::default(), at(2, 17, 0), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.hours_worked.to_string(), "8.00");
        assert_eq!(emp.attendance.len(), 1);
    }

    #[test]
    fn test_clock_in_after_threshold_is_late() {
        let mut emp = employee();
        let record = clock_in(&mut emp, at_desk(), at(2, 9, 20), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_clock_in_at_threshold_is_on_time() {
        let mut emp = employee();
        let record = clock_in(&mut emp, at_desk(), at(2, 9, 15), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::InProgress);
    }

    #[test]
    fn test_late_stays_late_after_full_day() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 40), &site()).unwrap();
        let record = clock_out(&mut emp, ClockOutRequest::default(), at(2, 18, 0), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_short_day_is_half_day() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        let record = clock_out(&mut emp, ClockOutRequest::default(), at(2, 12, 0), &site()).unwrap();
        assert_eq!(record.status, AttendanceStatus::HalfDay);
        assert_eq!(record.hours_worked, Decimal::new(300, 2));
    }

    #[test]
    fn test_second_clock_in_same_day_fails() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();

        let result = clock_in(&mut emp, at_desk(), at(2, 9, 5), &site());
        assert_eq!(result, Err(EngineError::AlreadyClockedIn { date: day(2) }));

        // Still refused after the shift has closed.
        clock_out(&mut emp, ClockOutRequest::default(), at(2, 17, 0), &site()).unwrap();
        let result = clock_in(&mut emp, at_desk(), at(2, 23, 0), &site());
        assert_eq!(result, Err(EngineError::AlreadyClockedIn { date: day(2) }));
    }

    #[test]
    fn test_location_is_required() {
        let mut emp = employee();
        let blank = ClockInRequest {
            location: Some("   ".to_string()),
            notes: None,
        };
        assert_eq!(
            clock_in(&mut emp, blank, at(2, 9, 0), &site()),
            Err(EngineError::LocationRequired)
        );
        assert_eq!(
            clock_in(&mut emp, ClockInRequest::default(), at(2, 9, 0), &site()),
            Err(EngineError::LocationRequired)
        );
        assert!(emp.attendance.is_empty());
    }

    #[test]
    fn test_minimum_gap_between_shifts() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 14, 0), &site()).unwrap();
        clock_out(&mut emp, ClockOutRequest::default(), at(2, 22, 0), &site()).unwrap();

        // 7 hours after the previous clock-out.
        let result = clock_in(&mut emp, at_desk(), at(3, 5, 0), &site());
        assert_eq!(
            result,
            Err(EngineError::MinShiftInterval {
                required_hours: 8,
                remaining_minutes: 60,
            })
        );

        // Exactly 8 hours later is allowed.
        let record = clock_in(&mut emp, at_desk(), at(3, 6, 0), &site()).unwrap();
        assert_eq!(record.date, day(3));
    }

    #[test]
    fn test_clock_out_boundaries() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();

        let result = clock_out(&mut emp, ClockOutRequest::default(), at(2, 9, 29), &site());
        assert_eq!(
            result,
            Err(EngineError::MinShiftDuration {
                required_minutes: 30,
                elapsed_minutes: 29,
            })
        );

        let record = clock_out(&mut emp, ClockOutRequest::default(), at(2, 9, 30), &site()).unwrap();
        assert_eq!(record.hours_worked, Decimal::new(50, 2));
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_clock_out_without_clock_in() {
        let mut emp = employee();
        assert_eq!(
            clock_out(&mut emp, ClockOutRequest::default(), at(2, 17, 0), &site()),
            Err(EngineError::NoClockInRecord { date: day(2) })
        );
    }

    #[test]
    fn test_double_clock_out() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        clock_out(&mut emp, ClockOutRequest::default(), at(2, 17, 0), &site()).unwrap();
        assert_eq!(
            clock_out(&mut emp, ClockOutRequest::default(), at(2, 18, 0), &site()),
            Err(EngineError::AlreadyClockedOut { date: day(2) })
        );
    }

    #[test]
    fn test_overnight_clock_out_closes_yesterday() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 22, 0), &site()).unwrap();
        let record = clock_out(&mut emp, ClockOutRequest::default(), at(3, 6, 0), &site()).unwrap();

        assert_eq!(record.date, day(2));
        assert_eq!(record.clock_out, Some(t(6, 0)));
        assert_eq!(record.hours_worked, Decimal::new(800, 2));
        assert!(emp.attendance_on(day(3)).is_none());
    }

    #[test]
    fn test_stale_open_record_is_not_closed() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        assert_eq!(
            clock_out(&mut emp, ClockOutRequest::default(), at(3, 10, 0), &site()),
            Err(EngineError::NoClockInRecord { date: day(3) })
        );
    }

    #[test]
    fn test_site_timezone_decides_the_day_and_lateness() {
        let kolkata = SiteConfig::with_timezone(Tz::Asia__Kolkata);
        let mut emp = employee();

        // 03:50 UTC is 09:20 in Kolkata.
        let record = clock_in(&mut emp, at_desk(), at(2, 3, 50), &kolkata).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
        assert_eq!(record.clock_in, Some(t(9, 20)));

        // 19:00 UTC on the 2nd is already the 3rd in Kolkata.
        let mut other = employee();
        let record = clock_in(&mut other, at_desk(), at(2, 19, 0), &kolkata).unwrap();
        assert_eq!(record.date, day(3));
    }

    #[test]
    fn test_inactive_employee_cannot_clock_in() {
        let mut emp = employee();
        emp.status = EmployeeStatus::Inactive;
        assert!(matches!(
            clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()),
            Err(EngineError::EmployeeInactive { .. })
        ));
    }

    #[test]
    fn test_clock_in_fills_placeholder() {
        let mut emp = employee();
        let mut placeholder =
            AttendanceRecord::without_times(day(2), AttendanceStatus::Pending, "Not recorded");
        placeholder.correction_status = CorrectionStatus::Requested;
        emp.put_attendance(placeholder);

        let record = clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        assert_eq!(record.location, "Front desk");
        assert_eq!(record.status, AttendanceStatus::InProgress);
        assert_eq!(record.correction_status, CorrectionStatus::Requested);
        assert_eq!(emp.attendance.len(), 1);
    }

    #[test]
    fn test_override_sets_status_verbatim() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();

        let record = override_attendance(
            &mut emp,
            day(2),
            AttendanceOverride {
                status: Some(AttendanceStatus::Absent),
                notes: Some("Sent home".to_string()),
                ..Default::default()
            },
            &site(),
        )
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.notes.as_deref(), Some("Sent home"));
    }

    #[test]
    fn test_override_creates_record_and_recomputes_hours() {
        let mut emp = employee();
        let record = override_attendance(
            &mut emp,
            day(1),
            AttendanceOverride {
                status: Some(AttendanceStatus::Late),
                clock_in: Some("09:30".to_string()),
                clock_out: Some("18:00".to_string()),
                ..Default::default()
            },
            &site(),
        )
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Late);
        assert_eq!(record.hours_worked, Decimal::new(850, 2));
        assert_eq!(record.location, "Not recorded");
    }

    #[test]
    fn test_override_times_keep_status() {
        let mut emp = employee();
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        clock_out(&mut emp, ClockOutRequest::default(), at(2, 17, 0), &site()).unwrap();

        let record = override_attendance(
            &mut emp,
            day(2),
            AttendanceOverride {
                clock_out: Some("11:00".to_string()),
                ..Default::default()
            },
            &site(),
        )
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.hours_worked, Decimal::new(200, 2));
    }

    #[test]
    fn test_override_rejects_bad_time() {
        let mut emp = employee();
        let result = override_attendance(
            &mut emp,
            day(1),
            AttendanceOverride {
                clock_in: Some("late".to_string()),
                ..Default::default()
            },
            &site(),
        );
        assert!(matches!(result, Err(EngineError::InvalidTimeFormat { .. })));
        assert!(emp.attendance.is_empty());
    }

    #[test]
    fn test_today_record() {
        let mut emp = employee();
        assert!(today_record(&emp, at(2, 8, 0), &site()).is_none());
        clock_in(&mut emp, at_desk(), at(2, 9, 0), &site()).unwrap();
        assert!(today_record(&emp, at(2, 12, 0), &site()).is_some());
        assert!(today_record(&emp, at(3, 12, 0), &site()).is_none());
    }
}
