//! Response types for the attendance API.
//!
//! This module defines the error body, maps [`EngineError`] kinds onto
//! HTTP status codes and shapes planned shifts for output.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};
use crate::models::PlannedShift;

/// A planned shift with its derived length.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftView {
    /// The stored shift.
    #[serde(flatten)]
    pub shift: PlannedShift,
    /// Planned length in hours.
    pub planned_hours: Decimal,
}

impl From<PlannedShift> for ShiftView {
    fn from(shift: PlannedShift) -> Self {
        Self {
            planned_hours: shift.planned_hours(),
            shift,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a path or query parameter that did not parse.
    pub fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::with_details(
            "INVALID_PARAMETER",
            format!("Invalid value for '{}'", name),
            format!("'{}' could not be parsed", value),
        )
    }
}

/// HTTP status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::StateConflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Policy => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = status_for(error.kind());
        let body = match &error {
            // Internal failures are logged by the handler, never echoed.
            EngineError::Storage { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. } => {
                ApiError::new(error.code(), "Internal server error")
            }
            EngineError::MissingFields { fields } => {
                ApiError::with_details(error.code(), error.to_string(), fields.join(","))
            }
            _ => ApiError::new(error.code(), error.to_string()),
        };
        ApiErrorResponse {
            status,
            error: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_kinds_map_to_status_codes() {
        let cases = [
            (EngineError::LocationRequired, StatusCode::BAD_REQUEST),
            (
                EngineError::AlreadyClockedIn {
                    date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::LeaveNotFound {
                    leave_id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::MinShiftDuration {
                    required_minutes: 30,
                    elapsed_minutes: 5,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EngineError::Storage {
                    message: "disk full".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, expected);
        }
    }

    #[test]
    fn test_missing_fields_lists_fields_in_details() {
        let response: ApiErrorResponse = EngineError::missing(["date", "reason"]).into();
        assert_eq!(response.error.code, "MISSING_FIELDS");
        assert_eq!(response.error.details.as_deref(), Some("date,reason"));
    }

    #[test]
    fn test_server_errors_use_generic_message() {
        let response: ApiErrorResponse = EngineError::Storage {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(response.error.code, "SERVER_ERROR");
        assert_eq!(response.error.message, "Internal server error");
    }

    #[test]
    fn test_shift_view_carries_planned_hours() {
        use crate::models::ShiftStatus;
        use chrono::{TimeZone, Utc};

        let start = Utc.with_ymd_and_hms(2026, 3, 12, 22, 0, 0).unwrap();
        let view = ShiftView::from(PlannedShift {
            id: uuid::Uuid::new_v4(),
            employee_id: "emp_002".to_string(),
            start,
            end: Utc.with_ymd_and_hms(2026, 3, 13, 6, 0, 0).unwrap(),
            location: None,
            status: ShiftStatus::Scheduled,
            notes: None,
            created_at: start,
            updated_at: start,
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["planned_hours"], "8.00");
        assert_eq!(json["employee_id"], "emp_002");
    }
}
