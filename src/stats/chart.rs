//! Rolling hours chart for the dashboard.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::time::two_places;

use super::summary::effective_status;

/// One day on the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Site-local day.
    pub date: NaiveDate,
    /// Hours worked that day; zero for absent or unrecorded days.
    pub hours: Decimal,
}

/// Builds a chart of the `days` days ending at `today`, oldest first.
///
/// `records` must be sorted by date, as the employee ledger keeps them.
pub fn dashboard_chart(records: &[AttendanceRecord], today: NaiveDate, days: i64) -> Vec<ChartPoint> {
    (0..days.max(0))
        .rev()
        .map(|back| today - Duration::days(back))
        .map(|date| {
            let hours = match records.binary_search_by_key(&date, |r| r.date) {
                Ok(i) if effective_status(&records[i], today) != AttendanceStatus::Absent => {
                    records[i].computed_hours()
                }
                _ => two_places(Decimal::ZERO),
            };
            ChartPoint { date, hours }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_window_is_oldest_to_newest() {
        let chart = dashboard_chart(&[], day(30), 30);
        assert_eq!(chart.len(), 30);
        assert_eq!(chart[0].date, day(1));
        assert_eq!(chart[29].date, day(30));
        assert!(chart.iter().all(|p| p.hours.is_zero()));
    }

    #[test]
    fn test_hours_per_day() {
        let mut worked = AttendanceRecord::clocked_in(
            day(9),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            AttendanceStatus::Present,
            "Front desk",
            None,
        );
        worked.clock_out = NaiveTime::from_hms_opt(15, 30, 0);
        worked.recompute_hours();

        let mut absent = worked.clone();
        absent.date = day(8);
        absent.status = AttendanceStatus::Absent;

        let chart = dashboard_chart(&[absent, worked], day(10), 3);
        let hours: Vec<String> = chart.iter().map(|p| p.hours.to_string()).collect();
        assert_eq!(hours, vec!["0.00", "6.50", "0.00"]);
    }

    #[test]
    fn test_zero_days_is_empty() {
        assert!(dashboard_chart(&[], day(10), 0).is_empty());
    }
}
