//! Correction requests against attendance records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::review::ReviewStatus;

/// What the employee asks to have corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionType {
    /// The recorded clock-in time is wrong or missing.
    ClockIn,
    /// The recorded clock-out time is wrong or missing.
    ClockOut,
    /// The day should be treated as an absence.
    Absence,
}

impl CorrectionType {
    /// Whether this correction carries a replacement time.
    pub fn needs_time(&self) -> bool {
        match self {
            CorrectionType::ClockIn | CorrectionType::ClockOut => true,
            CorrectionType::Absence => false,
        }
    }
}

/// An employee-submitted correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// The attendance day being corrected.
    pub date: NaiveDate,
    /// What is being corrected.
    pub correction_type: CorrectionType,
    /// Replacement time for clock-in/clock-out corrections.
    #[serde(default)]
    pub requested_time: Option<NaiveTime>,
    /// Why the correction is needed.
    pub reason: String,
    /// Review status.
    pub status: ReviewStatus,
    /// Reviewer's note.
    #[serde(default)]
    pub review_note: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request was reviewed.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}
