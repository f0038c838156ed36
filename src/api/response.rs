//! Response types for the HR operations API.
//!
//! This module defines the response bodies, the error response structure
//! and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AttendanceRecord, AttendanceSummary, Employee, LeaveRequest, PayPeriod};

/// An attendance record with its display duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceView {
    /// The stored record.
    #[serde(flatten)]
    pub record: AttendanceRecord,
    /// Time between check-in and check-out as `"{h}h {m}m"`.
    pub work_duration: String,
}

impl From<AttendanceRecord> for AttendanceView {
    fn from(record: AttendanceRecord) -> Self {
        let work_duration = record.work_duration();
        Self {
            record,
            work_duration,
        }
    }
}

/// A leave request with the applicant's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveView {
    /// The stored request.
    #[serde(flatten)]
    pub leave: LeaveRequest,
    /// Applicant's display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
}

/// A newly registered employee with the bearer token issued for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredEmployee {
    /// The stored employee.
    #[serde(flatten)]
    pub employee: Employee,
    /// Token the employee authenticates with.
    pub token: String,
}

/// Attendance summary for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The summarized employee.
    pub employee_id: String,
    /// The summarized month.
    pub period: PayPeriod,
    /// The aggregate figures.
    pub summary: AttendanceSummary,
}

/// A list of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Number of items in `data`.
    pub count: usize,
    /// The items.
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// One page of a longer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Number of items on this page.
    pub count: usize,
    /// Number of matching items across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Number of pages.
    pub pages: usize,
    /// The items on this page.
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    /// Cuts page `page` (1-based) of size `limit` out of `items`.
    pub fn paginate(items: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = items.len();
        let data: Vec<T> = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        Self {
            count: data.len(),
            total,
            page,
            pages: total.div_ceil(limit),
            data,
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
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::AlreadyCheckedIn { .. } => (StatusCode::BAD_REQUEST, "ALREADY_CHECKED_IN"),
            EngineError::NotCheckedIn { .. } => (StatusCode::BAD_REQUEST, "NOT_CHECKED_IN"),
            EngineError::AlreadyCheckedOut { .. } => {
                (StatusCode::BAD_REQUEST, "ALREADY_CHECKED_OUT")
            }
            EngineError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            EngineError::InvalidSchedule { .. } => (StatusCode::BAD_REQUEST, "INVALID_SCHEDULE"),
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            EngineError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            EngineError::DuplicateKey { .. } => (StatusCode::CONFLICT, "DUPLICATE_KEY"),
            EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EngineError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            EngineError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            EngineError::StoreUnavailable { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_UNAVAILABLE")
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
        };

        let error = match error {
            EngineError::Unauthenticated { reason } => {
                ApiError::with_details(code, "Not authenticated", reason)
            }
            EngineError::StoreUnavailable { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. } => {
                ApiError::with_details(code, "Internal error", message)
            }
            _ => ApiError::new(code, message),
        };
        ApiErrorResponse { status, error }
    }
}
