//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints for attendance, corrections,
//! leaves and planned shifts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CorrectionReviewRequest, LeaveListQuery, LeaveStatusRequest, RegisterEmployeeRequest,
    ShiftListQuery, StatsQuery,
};
pub use response::{ApiError, ApiErrorResponse, ShiftView, status_for};
pub use state::AppState;
