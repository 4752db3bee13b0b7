//! Configuration types for the attendance engine.
//!
//! These are deserialized from the site YAML file. Every section has a
//! default so a partial file only overrides what it names.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::time;

/// Identity and timezone of the single site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Human-readable site name.
    pub name: String,
    /// The one timezone used for every date/time classification.
    pub timezone: Tz,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Main site".to_string(),
            timezone: Tz::UTC,
        }
    }
}

/// Clock-in/clock-out rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// Clock-ins strictly after this local time are marked late.
    pub late_threshold: NaiveTime,
    /// Minimum hours between the end of one shift and the next clock-in.
    pub min_shift_gap_hours: i64,
    /// Minimum minutes between clock-in and clock-out.
    pub min_shift_minutes: i64,
    /// Shifts of at least this many hours count as a full day.
    pub full_day_hours: Decimal,
    /// Location stored on records created without a clock-in.
    pub unrecorded_location: String,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_threshold: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            min_shift_gap_hours: 8,
            min_shift_minutes: 30,
            full_day_hours: Decimal::new(4, 0),
            unrecorded_location: "Not recorded".to_string(),
        }
    }
}

/// Correction request rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorrectionPolicy {
    /// How many calendar days back a correction may reach (inclusive).
    pub window_days: i64,
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self { window_days: 7 }
    }
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of days in the rolling hours chart.
    pub chart_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { chart_days: 30 }
    }
}

/// Complete site configuration.
///
/// # Example
///
/// ```
/// use attendance_engine::config::SiteConfig;
///
/// let config = SiteConfig::default();
/// assert_eq!(config.attendance.min_shift_minutes, 30);
/// assert_eq!(config.corrections.window_days, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identity and timezone.
    pub site: SiteInfo,
    /// Attendance rules.
    pub attendance: AttendancePolicy,
    /// Correction rules.
    pub corrections: CorrectionPolicy,
    /// Dashboard settings.
    pub dashboard: DashboardConfig,
}

impl SiteConfig {
    /// Returns a default configuration using the given timezone.
    pub fn with_timezone(timezone: Tz) -> Self {
        let mut config = Self::default();
        config.site.timezone = timezone;
        config
    }

    /// The site timezone.
    pub fn timezone(&self) -> Tz {
        self.site.timezone
    }

    /// The site-local calendar day containing `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        time::today(self.site.timezone, now)
    }

    /// The site-local wall-clock reading of `now`.
    pub fn local_now(&self, now: DateTime<Utc>) -> NaiveDateTime {
        time::local_now(self.site.timezone, now)
    }
}
