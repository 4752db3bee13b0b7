//! Wall-clock parsing and duration arithmetic.
//!
//! Attendance is recorded as a site-local calendar day plus optional
//! times of day. These helpers convert between those strings and absolute
//! instants, and compute worked hours with midnight wrap.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Parses a `HH:mm` or `HH:mm:ss` time of day.
///
/// # Example
///
/// ```
/// use attendance_engine::time::parse_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time("09:15").unwrap(), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
/// assert_eq!(parse_time("17:30:45").unwrap(), NaiveTime::from_hms_opt(17, 30, 45).unwrap());
/// assert!(parse_time("9h15").is_err());
/// ```
pub fn parse_time(value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| EngineError::InvalidTimeFormat {
            value: value.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

/// Length of the interval from `clock_in` to `clock_out`, assuming a
/// midnight crossing when `clock_out` is earlier in the day.
pub fn span(clock_in: NaiveTime, clock_out: NaiveTime) -> Duration {
    let mut seconds = (clock_out - clock_in).num_seconds();
    if seconds < 0 {
        seconds += SECONDS_PER_DAY;
    }
    Duration::seconds(seconds)
}

/// Worked hours between two times of day, rounded to 2 decimal places.
///
/// When `clock_out` is earlier than `clock_in` the shift is taken to cross
/// midnight and 24 hours are added. The result lies in `[0, 24]`.
///
/// # Example
///
/// ```
/// use attendance_engine::time::duration_hours;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
/// assert_eq!(duration_hours(nine, five), Decimal::new(800, 2));
///
/// // 22:00 -> 06:00 crosses midnight
/// let ten_pm = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
/// let six_am = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
/// assert_eq!(duration_hours(ten_pm, six_am), Decimal::new(800, 2));
/// ```
pub fn duration_hours(clock_in: NaiveTime, clock_out: NaiveTime) -> Decimal {
    let seconds = span(clock_in, clock_out).num_seconds();
    two_places(Decimal::new(seconds, 0) / Decimal::new(SECONDS_PER_HOUR, 0))
}

/// Rounds to exactly 2 decimal places, keeping the trailing zeros.
///
/// ```
/// use attendance_engine::time::two_places;
/// use rust_decimal::Decimal;
///
/// assert_eq!(two_places(Decimal::new(8, 0)).to_string(), "8.00");
/// assert_eq!(two_places(Decimal::new(33333, 4)).to_string(), "3.33");
/// ```
pub fn two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// String form of [`duration_hours`], failing `InvalidTimeFormat` on bad input.
pub fn duration(clock_in: &str, clock_out: &str) -> EngineResult<Decimal> {
    let start = parse_time(clock_in)?;
    let end = parse_time(clock_out)?;
    Ok(duration_hours(start, end))
}

/// Composes a site-local date and time into an absolute instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// local times skipped by a DST jump fail `NonexistentLocalTime`.
///
/// # Example
///
/// ```
/// use attendance_engine::time::combine;
/// use chrono::{NaiveDate, NaiveTime};
/// use chrono_tz::Tz;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let instant = combine(date, time, Tz::Asia__Kolkata).unwrap();
/// assert_eq!(instant.to_rfc3339(), "2026-03-02T03:30:00+00:00");
/// ```
pub fn combine(date: NaiveDate, time: NaiveTime, zone: Tz) -> EngineResult<DateTime<Utc>> {
    zone.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| EngineError::NonexistentLocalTime {
            date,
            time: time.format("%H:%M:%S").to_string(),
        })
}

/// Instant at which the site-local `date` begins.
pub fn start_of_day(date: NaiveDate, zone: Tz) -> EngineResult<DateTime<Utc>> {
    match combine(date, NaiveTime::default(), zone) {
        Ok(instant) => Ok(instant),
        // Some zones skip midnight on DST days; the day then starts at 01:00.
        Err(_) => combine(
            date,
            NaiveTime::from_hms_opt(1, 0, 0).unwrap_or_default(),
            zone,
        ),
    }
}

/// The site-local calendar day containing `now`.
pub fn today(zone: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&zone).date_naive()
}

/// The site-local wall-clock reading of `now`.
pub fn local_now(zone: Tz, now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&zone).naive_local()
}

/// Inclusive number of calendar days from `start` to `end`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
