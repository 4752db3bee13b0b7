//! Planned-shift construction, patching and querying.
//!
//! These functions validate and shape [`PlannedShift`] values. Persistence and
//! the employee back-reference are handled by the caller.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PlannedShift, ShiftStatus};
use crate::time;

/// Payload for a new planned shift. Dates are `YYYY-MM-DD`, times
/// `HH:mm[:ss]`, all in the site timezone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftInput {
    /// Employee who will work the shift.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Start day.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Start time.
    #[serde(default)]
    pub start_time: Option<String>,
    /// End day.
    #[serde(default)]
    pub end_date: Option<String>,
    /// End time.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Optional location.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a planned shift. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftPatch {
    /// New start day.
    #[serde(default)]
    pub start_date: Option<String>,
    /// New start time.
    #[serde(default)]
    pub start_time: Option<String>,
    /// New end day.
    #[serde(default)]
    pub end_date: Option<String>,
    /// New end time.
    #[serde(default)]
    pub end_time: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<ShiftStatus>,
}

/// Filters for [`query_shifts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftQuery {
    /// Only this employee's shifts.
    pub employee_id: Option<String>,
    /// Only shifts ending on or after this site-local day.
    pub from: Option<NaiveDate>,
    /// Only shifts starting on or before this site-local day.
    pub to: Option<NaiveDate>,
    /// Only shifts in this status.
    pub status: Option<ShiftStatus>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn instant(date: &str, clock: &str, zone: Tz) -> EngineResult<DateTime<Utc>> {
    let date = time::parse_date(date)?;
    let clock = time::parse_time(clock)?;
    time::combine(date, clock, zone)
}

fn ensure_chronology(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<()> {
    if start > end {
        return Err(EngineError::InvalidChronology {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }
    Ok(())
}

/// Validates `input` and builds a `scheduled` shift.
///
/// Fails `MissingFields`, `InvalidDateFormat`, `InvalidTimeFormat`,
/// `NonexistentLocalTime` or `InvalidChronology`. Whether the employee
/// exists is checked by the caller.
pub fn build_shift(
    input: ShiftInput,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<PlannedShift> {
    let fields = [
        ("employee_id", filled(&input.employee_id)),
        ("start_date", filled(&input.start_date)),
        ("start_time", filled(&input.start_time)),
        ("end_date", filled(&input.end_date)),
        ("end_time", filled(&input.end_time)),
    ];
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    let [
        (_, Some(employee_id)),
        (_, Some(start_date)),
        (_, Some(start_time)),
        (_, Some(end_date)),
        (_, Some(end_time)),
    ] = fields
    else {
        return Err(EngineError::missing(missing));
    };

    let zone = site.timezone();
    let start = instant(start_date, start_time, zone)?;
    let end = instant(end_date, end_time, zone)?;
    ensure_chronology(start, end)?;

    Ok(PlannedShift {
        id: Uuid::new_v4(),
        employee_id: employee_id.to_string(),
        start,
        end,
        location: filled(&input.location).map(str::to_string),
        status: ShiftStatus::Scheduled,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    })
}

/// Applies `patch` to `shift`.
///
/// Supplied date or time parts replace the matching site-local part of the
/// current boundary. Chronology and status transitions are re-validated;
/// on error `shift` is left unchanged.
pub fn apply_patch(
    shift: &mut PlannedShift,
    patch: ShiftPatch,
    now: DateTime<Utc>,
    site: &SiteConfig,
) -> EngineResult<()> {
    let zone = site.timezone();

    let boundary = |current: DateTime<Utc>,
                    date: &Option<String>,
                    clock: &Option<String>|
     -> EngineResult<DateTime<Utc>> {
        if filled(date).is_none() && filled(clock).is_none() {
            return Ok(current);
        }
        let local = current.with_timezone(&zone);
        let date: NaiveDate = match filled(date) {
            Some(d) => time::parse_date(d)?,
            None => local.date_naive(),
        };
        let clock: NaiveTime = match filled(clock) {
            Some(t) => time::parse_time(t)?,
            None => local.time(),
        };
        time::combine(date, clock, zone)
    };

    let start = boundary(shift.start, &patch.start_date, &patch.start_time)?;
    let end = boundary(shift.end, &patch.end_date, &patch.end_time)?;
    ensure_chronology(start, end)?;

    if let Some(next) = patch.status {
        if next != shift.status && !shift.status.can_transition_to(next) {
            return Err(EngineError::InvalidStatusTransition {
                shift_id: shift.id.to_string(),
                from: shift.status.to_string(),
                to: next.to_string(),
            });
        }
        shift.status = next;
    }

    shift.start = start;
    shift.end = end;
    if patch.location.is_some() {
        shift.location = filled(&patch.location).map(str::to_string);
    }
    if patch.notes.is_some() {
        shift.notes = patch.notes;
    }
    shift.updated_at = now;

    Ok(())
}

/// Adds `shift_id` to the employee's planned shifts.
pub fn attach(employee: &mut Employee, shift_id: Uuid) {
    if !employee.planned_shifts.contains(&shift_id) {
        employee.planned_shifts.push(shift_id);
    }
}

/// Removes `shift_id` from the employee's planned shifts.
pub fn detach(employee: &mut Employee, shift_id: Uuid) {
    employee.planned_shifts.retain(|id| *id != shift_id);
}

/// Filters `shifts` and sorts them by start ascending.
pub fn query_shifts<I>(shifts: I, query: &ShiftQuery, zone: Tz) -> Vec<PlannedShift>
where
    I: IntoIterator<Item = PlannedShift>,
{
    let mut matching: Vec<PlannedShift> = shifts
        .into_iter()
        .filter(|s| query.employee_id.as_ref().is_none_or(|id| *id == s.employee_id))
        .filter(|s| query.status.is_none_or(|status| s.status == status))
        .filter(|s| {
            query
                .from
                .is_none_or(|from| s.end.with_timezone(&zone).date_naive() >= from)
        })
        .filter(|s| {
            query
                .to
                .is_none_or(|to| s.start.with_timezone(&zone).date_naive() <= to)
        })
        .collect();

    matching.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn input(start: (&str, &str), end: (&str, &str)) -> ShiftInput {
        ShiftInput {
            employee_id: Some("emp_001".to_string()),
            start_date: Some(start.0.to_string()),
            start_time: Some(start.1.to_string()),
            end_date: Some(end.0.to_string()),
            end_time: Some(end.1.to_string()),
            location: Some("Kitchen".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_build_shift() {
        let shift = build_shift(
            input(("2024-01-10", "22:00"), ("2024-01-11", "06:00")),
            now(),
            &site(),
        )
        .unwrap();

        assert_eq!(shift.status, ShiftStatus::Scheduled);
        assert_eq!(shift.start, Utc.with_ymd_and_hms(2024, 1, 10, 22, 0, 0).unwrap());
        assert_eq!(shift.planned_hours().to_string(), "8.00");
        assert_eq!(shift.location.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_end_before_start_is_invalid_chronology() {
        let result = build_shift(
            input(("2024-01-10", "09:00"), ("2024-01-10", "08:00")),
            now(),
            &site(),
        );
        assert!(matches!(result, Err(EngineError::InvalidChronology { .. })));
    }

    #[test]
    fn test_missing_fields() {
        let result = build_shift(
            ShiftInput {
                employee_id: Some("emp_001".to_string()),
                start_date: Some("2024-01-10".to_string()),
                end_time: Some(" ".to_string()),
                ..Default::default()
            },
            now(),
            &site(),
        );
        assert_eq!(
            result,
            Err(EngineError::missing(["start_time", "end_date", "end_time"]))
        );
    }

    #[test]
    fn test_site_timezone_applies() {
        let kolkata = SiteConfig::with_timezone(Tz::Asia__Kolkata);
        let shift = build_shift(
            input(("2024-01-10", "09:00"), ("2024-01-10", "17:00")),
            now(),
            &kolkata,
        )
        .unwrap();
        assert_eq!(shift.start, Utc.with_ymd_and_hms(2024, 1, 10, 3, 30, 0).unwrap());
    }

    #[test]
    fn test_patch_replaces_parts_and_revalidates() {
        let mut shift = build_shift(
            input(("2024-01-10", "09:00"), ("2024-01-10", "17:00")),
            now(),
            &site(),
        )
        .unwrap();

        apply_patch(
            &mut shift,
            ShiftPatch {
                end_time: Some("19:30".to_string()),
                notes: Some("Covering".to_string()),
                ..Default::default()
            },
            now(),
            &site(),
        )
        .unwrap();
        assert_eq!(shift.end, Utc.with_ymd_and_hms(2024, 1, 10, 19, 30, 0).unwrap());
        assert_eq!(shift.notes.as_deref(), Some("Covering"));

        let before = shift.clone();
        let result = apply_patch(
            &mut shift,
            ShiftPatch {
                start_date: Some("2024-01-11".to_string()),
                ..Default::default()
            },
            now(),
            &site(),
        );
        assert!(matches!(result, Err(EngineError::InvalidChronology { .. })));
        assert_eq!(shift, before);
    }

    #[test]
    fn test_status_transitions() {
        let mut shift = build_shift(
            input(("2024-01-10", "09:00"), ("2024-01-10", "17:00")),
            now(),
            &site(),
        )
        .unwrap();

        for next in [ShiftStatus::InProgress, ShiftStatus::Completed] {
            let patch = ShiftPatch {
                status: Some(next),
                ..Default::default()
            };
            apply_patch(&mut shift, patch, now(), &site()).unwrap();
        }
        assert_eq!(shift.status, ShiftStatus::Completed);

        let reopen = ShiftPatch {
            status: Some(ShiftStatus::Scheduled),
            ..Default::default()
        };
        assert_eq!(
            apply_patch(&mut shift, reopen, now(), &site()),
            Err(EngineError::InvalidStatusTransition {
                shift_id: shift.id.to_string(),
                from: "completed".to_string(),
                to: "scheduled".to_string(),
            })
        );
    }

    #[test]
    fn test_attach_and_detach() {
        let mut employee = Employee::new("emp_001", "Asha");
        let id = Uuid::new_v4();
        attach(&mut employee, id);
        attach(&mut employee, id);
        assert_eq!(employee.planned_shifts, vec![id]);
        detach(&mut employee, id);
        assert!(employee.planned_shifts.is_empty());
    }

    #[test]
    fn test_query_sorts_by_start() {
        let late = build_shift(input(("2024-01-12", "09:00"), ("2024-01-12", "17:00")), now(), &site())
            .unwrap();
        let early = build_shift(input(("2024-01-10", "09:00"), ("2024-01-10", "17:00")), now(), &site())
            .unwrap();
        let mut other = build_shift(input(("2024-01-11", "09:00"), ("2024-01-11", "17:00")), now(), &site())
            .unwrap();
        other.employee_id = "emp_002".to_string();

        let all = query_shifts(
            vec![late.clone(), early.clone(), other.clone()],
            &ShiftQuery::default(),
            Tz::UTC,
        );
        assert_eq!(all, vec![early.clone(), other.clone(), late.clone()]);

        let mine = ShiftQuery {
            employee_id: Some("emp_001".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 1, 11),
            ..Default::default()
        };
        assert_eq!(
            query_shifts(vec![late.clone(), early, other], &mine, Tz::UTC),
            vec![late]
        );
    }
}
