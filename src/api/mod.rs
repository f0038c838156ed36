//! HTTP API module for the HR operations engine.
//!
//! This module provides the REST endpoints for attendance, leave, employee
//! and payroll management on top of the rule engine and the store.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::{CredentialVerifier, TokenTable, current_employee, ensure_self_or};
pub use handlers::create_router;
pub use request::{
    DraftPayrollRequest, EmployeeQuery, HistoryQuery, LeaveApplication, LeaveDates, LeaveReview,
    PayrollStatusUpdate, PeriodQuery, PunchRequest, RegisterEmployee,
};
pub use response::{
    ApiError, ApiErrorResponse, AttendanceView, LeaveView, ListResponse, PageResponse,
    RegisteredEmployee, SummaryResponse,
};
pub use state::{AppState, Clock, ManualClock, SystemClock};
