//! HTTP request handlers for the attendance API.
//!
//! Every handler tags its work with a correlation id, delegates to the
//! [`WorkforceService`](crate::service::WorkforceService) and renders engine
//! errors through [`ApiErrorResponse`].

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::{
    AttendanceOverride, ClockInRequest, ClockOutRequest, CorrectionInput, LeaveFilter, LeaveInput,
    LeaveListing,
};
use crate::models::{AttendanceRecord, CorrectionRequest, Employee, LeaveRequest};
use crate::scheduling::{ShiftInput, ShiftPatch, ShiftQuery};
use crate::service::Dashboard;
use crate::stats::AttendanceStats;
use crate::time::parse_date;

use super::request::{
    CorrectionReviewRequest, LeaveListQuery, LeaveStatusRequest, RegisterEmployeeRequest,
    ShiftListQuery, StatsQuery,
};
use super::response::{ApiError, ApiErrorResponse, ShiftView};
use super::state::AppState;

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", post(register_employee))
        .route("/employees/:id", get(get_employee))
        .route("/employees/:id/attendance/clock-in", post(clock_in))
        .route("/employees/:id/attendance/clock-out", post(clock_out))
        .route("/employees/:id/attendance/today", get(today_record))
        .route("/employees/:id/attendance/stats", get(attendance_stats))
        .route("/employees/:id/attendance/dashboard", get(dashboard))
        .route("/employees/:id/attendance/:date", put(override_attendance))
        .route("/employees/:id/corrections", post(request_correction))
        .route(
            "/employees/:id/corrections/:correction_id",
            put(review_correction),
        )
        .route("/employees/:id/leaves", post(request_leave))
        .route(
            "/employees/:id/leaves/:leave_id/status",
            put(update_leave_status),
        )
        .route("/employees/:id/leaves/:leave_id", delete(cancel_leave))
        .route("/leaves", get(list_leaves))
        .route("/shifts", post(create_shift).get(list_shifts))
        .route(
            "/shifts/:id",
            get(get_shift).put(update_shift).delete(delete_shift),
        )
        .with_state(state)
}

/// Logs a failed operation and converts the error for the response.
fn failed(correlation_id: Uuid, operation: &'static str, error: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        code = error.code(),
        error = %error,
        "Request failed"
    );
    error.into()
}

fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    ApiError::malformed_json(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

/// Parses an optional JSON body; an empty body yields the default value.
fn optional_body<T: DeserializeOwned + Default>(
    correlation_id: Uuid,
    body: &Bytes,
) -> Result<T, ApiErrorResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "JSON body error");
        ApiErrorResponse::bad_request(ApiError::malformed_json(err.to_string()))
    })
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiErrorResponse> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| {
            ApiErrorResponse::bad_request(ApiError::new("INVALID_QUERY", rejection.body_text()))
        })
}

fn uuid_param(name: &str, value: &str) -> Result<Uuid, ApiErrorResponse> {
    Uuid::parse_str(value)
        .map_err(|_| ApiErrorResponse::bad_request(ApiError::invalid_parameter(name, value)))
}

async fn register_employee(
    State(state): State<AppState>,
    payload: Result<Json<RegisterEmployeeRequest>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let employee = Employee::try_from(request)
        .map_err(|e| failed(correlation_id, "register_employee", e))?;
    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Registering employee");

    let employee = state
        .service()
        .register_employee(employee)
        .await
        .map_err(|e| failed(correlation_id, "register_employee", e))?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let employee = state
        .service()
        .employee(&employee_id)
        .await
        .map_err(|e| failed(correlation_id, "get_employee", e))?;
    Ok((StatusCode::OK, Json(employee)))
}

async fn clock_in(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<ClockInRequest>, JsonRejection>,
) -> ApiResult<AttendanceRecord> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing clock-in");
    let request = json_body(correlation_id, payload)?;

    let record = state
        .service()
        .clock_in(&employee_id, request)
        .await
        .map_err(|e| failed(correlation_id, "clock_in", e))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn clock_out(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    body: Bytes,
) -> ApiResult<AttendanceRecord> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing clock-out");
    let request: ClockOutRequest = optional_body(correlation_id, &body)?;

    let record = state
        .service()
        .clock_out(&employee_id, request)
        .await
        .map_err(|e| failed(correlation_id, "clock_out", e))?;
    Ok((StatusCode::OK, Json(record)))
}

async fn today_record(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Option<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    let record = state
        .service()
        .today_record(&employee_id)
        .await
        .map_err(|e| failed(correlation_id, "today_record", e))?;
    Ok((StatusCode::OK, Json(record)))
}

async fn override_attendance(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
    payload: Result<Json<AttendanceOverride>, JsonRejection>,
) -> ApiResult<AttendanceRecord> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        date = %date,
        "Processing attendance override"
    );
    let changes = json_body(correlation_id, payload)?;
    let date = parse_date(&date).map_err(|e| failed(correlation_id, "override_attendance", e))?;

    let record = state
        .service()
        .override_attendance(&employee_id, date, changes)
        .await
        .map_err(|e| failed(correlation_id, "override_attendance", e))?;
    Ok((StatusCode::OK, Json(record)))
}

async fn attendance_stats(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult<AttendanceStats> {
    let correlation_id = Uuid::new_v4();
    let (from, to) = query_params(query)?
        .bounds()
        .map_err(|e| failed(correlation_id, "attendance_stats", e))?;

    let stats = state
        .service()
        .attendance_stats(&employee_id, from, to)
        .await
        .map_err(|e| failed(correlation_id, "attendance_stats", e))?;
    Ok((StatusCode::OK, Json(stats)))
}

async fn dashboard(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Dashboard> {
    let correlation_id = Uuid::new_v4();
    let dashboard = state
        .service()
        .dashboard(&employee_id)
        .await
        .map_err(|e| failed(correlation_id, "dashboard", e))?;
    Ok((StatusCode::OK, Json(dashboard)))
}

async fn request_correction(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<CorrectionInput>, JsonRejection>,
) -> ApiResult<CorrectionRequest> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing correction request");
    let input = json_body(correlation_id, payload)?;

    let request = state
        .service()
        .request_correction(&employee_id, input)
        .await
        .map_err(|e| failed(correlation_id, "request_correction", e))?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn review_correction(
    State(state): State<AppState>,
    Path((employee_id, correction_id)): Path<(String, String)>,
    payload: Result<Json<CorrectionReviewRequest>, JsonRejection>,
) -> ApiResult<CorrectionRequest> {
    let correlation_id = Uuid::new_v4();
    let correction_id = uuid_param("correction_id", &correction_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        correction_id = %correction_id,
        "Processing correction review"
    );
    let review = json_body(correlation_id, payload)?;
    let decision = review
        .decision
        .ok_or_else(|| failed(correlation_id, "review_correction", EngineError::missing(["decision"])))?;

    let request = state
        .service()
        .review_correction(&employee_id, correction_id, decision, review.note)
        .await
        .map_err(|e| failed(correlation_id, "review_correction", e))?;
    Ok((StatusCode::OK, Json(request)))
}

async fn request_leave(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<LeaveInput>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing leave request");
    let input = json_body(correlation_id, payload)?;

    let leave = state
        .service()
        .request_leave(&employee_id, input)
        .await
        .map_err(|e| failed(correlation_id, "request_leave", e))?;
    Ok((StatusCode::CREATED, Json(leave)))
}

async fn update_leave_status(
    State(state): State<AppState>,
    Path((employee_id, leave_id)): Path<(String, String)>,
    payload: Result<Json<LeaveStatusRequest>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    let leave_id = uuid_param("leave_id", &leave_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        leave_id = %leave_id,
        "Processing leave status update"
    );
    let status = json_body(correlation_id, payload)?
        .status
        .ok_or_else(|| failed(correlation_id, "update_leave_status", EngineError::missing(["status"])))?;

    let leave = state
        .service()
        .update_leave_status(&employee_id, leave_id, status)
        .await
        .map_err(|e| failed(correlation_id, "update_leave_status", e))?;
    Ok((StatusCode::OK, Json(leave)))
}

async fn cancel_leave(
    State(state): State<AppState>,
    Path((employee_id, leave_id)): Path<(String, String)>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    let leave_id = uuid_param("leave_id", &leave_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        leave_id = %leave_id,
        "Processing leave cancellation"
    );

    let leave = state
        .service()
        .cancel_leave(&employee_id, leave_id)
        .await
        .map_err(|e| failed(correlation_id, "cancel_leave", e))?;
    Ok((StatusCode::OK, Json(leave)))
}

async fn list_leaves(
    State(state): State<AppState>,
    query: Result<Query<LeaveListQuery>, QueryRejection>,
) -> ApiResult<Vec<LeaveListing>> {
    let correlation_id = Uuid::new_v4();
    let filter = LeaveFilter::try_from(query_params(query)?)
        .map_err(|e| failed(correlation_id, "list_leaves", e))?;

    let leaves = state
        .service()
        .list_leaves(&filter)
        .await
        .map_err(|e| failed(correlation_id, "list_leaves", e))?;
    Ok((StatusCode::OK, Json(leaves)))
}

async fn create_shift(
    State(state): State<AppState>,
    payload: Result<Json<ShiftInput>, JsonRejection>,
) -> ApiResult<ShiftView> {
    let correlation_id = Uuid::new_v4();
    let input = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = input.employee_id.as_deref().unwrap_or_default(),
        "Processing shift creation"
    );

    let shift = state
        .service()
        .create_shift(input)
        .await
        .map_err(|e| failed(correlation_id, "create_shift", e))?;
    Ok((StatusCode::CREATED, Json(shift.into())))
}

async fn list_shifts(
    State(state): State<AppState>,
    query: Result<Query<ShiftListQuery>, QueryRejection>,
) -> ApiResult<Vec<ShiftView>> {
    let correlation_id = Uuid::new_v4();
    let query = ShiftQuery::try_from(query_params(query)?)
        .map_err(|e| failed(correlation_id, "list_shifts", e))?;

    let shifts = state
        .service()
        .list_shifts(&query)
        .await
        .map_err(|e| failed(correlation_id, "list_shifts", e))?;
    Ok((StatusCode::OK, Json(shifts.into_iter().map(ShiftView::from).collect())))
}

async fn get_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> ApiResult<ShiftView> {
    let correlation_id = Uuid::new_v4();
    let shift_id = uuid_param("shift_id", &shift_id)?;
    let shift = state
        .service()
        .shift(shift_id)
        .await
        .map_err(|e| failed(correlation_id, "get_shift", e))?;
    Ok((StatusCode::OK, Json(shift.into())))
}

async fn update_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ShiftPatch>, JsonRejection>,
) -> ApiResult<ShiftView> {
    let correlation_id = Uuid::new_v4();
    let shift_id = uuid_param("shift_id", &shift_id)?;
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing shift update");
    let patch = json_body(correlation_id, payload)?;

    let shift = state
        .service()
        .update_shift(shift_id, patch)
        .await
        .map_err(|e| failed(correlation_id, "update_shift", e))?;
    Ok((StatusCode::OK, Json(shift.into())))
}

async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> ApiResult<ShiftView> {
    let correlation_id = Uuid::new_v4();
    let shift_id = uuid_param("shift_id", &shift_id)?;
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing shift deletion");

    let shift = state
        .service()
        .delete_shift(shift_id)
        .await
        .map_err(|e| failed(correlation_id, "delete_shift", e))?;
    Ok((StatusCode::OK, Json(shift.into())))
}
