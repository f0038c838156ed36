//! HTTP request handlers for the HR operations API.
//!
//! Every handler follows the same shape: identify the caller, load the
//! records it needs from the store, run the rules from
//! [`crate::calculation`] and save the result. The rule work is synchronous,
//! so each handler delegates to a plain function returning [`EngineResult`]
//! and the async wrapper only parses input and shapes the response.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use chrono::Datelike;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{apply_check_in, apply_check_out, draft_payroll, start_of_day, summarize};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, EmploymentInfo, LeaveRequest, PayPeriod, PayrollRecord,
    REVIEWER_ROLES, Role,
};
use crate::store::{
    AttendanceRepository, DateRange, EmployeeFilter, EmployeeRepository, LeaveRepository,
    PayrollRepository,
};

use super::auth::{current_employee, ensure_self_or};
use super::request::{
    DraftPayrollRequest, EmployeeQuery, HistoryQuery, LeaveApplication, LeaveDates, LeaveReview,
    PayrollStatusUpdate, PeriodQuery, PunchRequest, RegisterEmployee,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceView, LeaveView, ListResponse, PageResponse,
    RegisteredEmployee, SummaryResponse,
};
use super::state::AppState;

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const DEFAULT_PAGE_SIZE: usize = 10;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/attendance/checkin", post(check_in_handler))
        .route("/attendance/checkout", post(check_out_handler))
        .route("/attendance/history", get(history_handler))
        .route("/attendance/summary", get(summary_handler))
        .route("/leaves", post(apply_leave_handler).get(own_leaves_handler))
        .route("/leaves/pending", get(pending_leaves_handler))
        .route("/leaves/:id", put(review_leave_handler))
        .route("/leaves/:id/dates", put(reschedule_leave_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(register_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler).delete(deactivate_employee_handler),
        )
        .route(
            "/payroll",
            get(list_payroll_handler).post(draft_payroll_handler),
        )
        .route("/payroll/employee/:id", get(employee_payroll_handler))
        .route("/payroll/:id/status", put(payroll_status_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
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

/// Identifies the caller ahead of reading the request body.
fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    roles: Option<&[Role]>,
    correlation_id: Uuid,
    operation: &'static str,
) -> ApiResult<Employee> {
    current_employee(state, headers, roles).map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            operation,
            error = %err,
            "Request rejected"
        );
        err.into()
    })
}

/// Logs the outcome of an operation and converts it into a response.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    result: EngineResult<T>,
) -> ApiResult<Json<T>> {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(Json(body))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request rejected"
            );
            Err(err.into())
        }
    }
}

fn created<T>(response: ApiResult<Json<T>>) -> ApiResult<(StatusCode, Json<T>)> {
    response.map(|body| (StatusCode::CREATED, body))
}

fn parse_id(entity: &str, id: &str) -> EngineResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| EngineError::not_found(entity, id))
}

fn requested_period(state: &AppState, month: Option<u32>, year: Option<i32>) -> EngineResult<PayPeriod> {
    let today = state.now();
    PayPeriod::new(month.unwrap_or(today.month()), year.unwrap_or(today.year()))
}

fn find_employee(state: &AppState, id: &str) -> EngineResult<Employee> {
    state
        .store()
        .find_employee(id)?
        .ok_or_else(|| EngineError::not_found("Employee", id))
}

fn with_notes(record: AttendanceRecord, notes: Option<&str>) -> EngineResult<AttendanceRecord> {
    match notes {
        Some(notes) => record.annotate(notes),
        None => Ok(record),
    }
}

/// Handler for GET /health.
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// =============================================================================
// Attendance
// =============================================================================

/// Handler for POST /attendance/checkin.
async fn check_in_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult<Json<AttendanceView>> {
    let correlation_id = Uuid::new_v4();
    let employee = authenticate(&state, &headers, None, correlation_id, "check_in")?;
    let request = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "check_in",
        check_in(&state, &employee, request, correlation_id),
    )
}

fn check_in(
    state: &AppState,
    employee: &Employee,
    request: PunchRequest,
    correlation_id: Uuid,
) -> EngineResult<AttendanceView> {
    let now = state.now();
    let day = start_of_day(now);
    let config = &state.config().config().attendance;
    let store = state.store();

    let record = store.with_day_lock(&employee.id, day, || {
        let existing = store.find_attendance(&employee.id, day)?;
        let record = apply_check_in(existing.as_ref(), employee, now, request.remarks, config)?;
        store.save_attendance(with_notes(record, request.notes.as_deref())?)
    })?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        date = %day,
        late_minutes = record.late_minutes,
        status = ?record.status,
        "Checked in"
    );
    Ok(record.into())
}

/// Handler for POST /attendance/checkout.
async fn check_out_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult<Json<AttendanceView>> {
    let correlation_id = Uuid::new_v4();
    let employee = authenticate(&state, &headers, None, correlation_id, "check_out")?;
    let request = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "check_out",
        check_out(&state, &employee, request, correlation_id),
    )
}

fn check_out(
    state: &AppState,
    employee: &Employee,
    request: PunchRequest,
    correlation_id: Uuid,
) -> EngineResult<AttendanceView> {
    let now = state.now();
    let day = start_of_day(now);
    let store = state.store();

    let record = store.with_day_lock(&employee.id, day, || {
        let existing = store
            .find_attendance(&employee.id, day)?
            .ok_or_else(|| EngineError::NotCheckedIn {
                employee_id: employee.id.clone(),
                date: day,
            })?;
        let record = apply_check_out(&existing, now, request.remarks)?;
        store.save_attendance(with_notes(record, request.notes.as_deref())?)
    })?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        date = %day,
        actual_hours = %record.working_hours.actual,
        overtime_hours = %record.overtime.hours,
        status = ?record.status,
        "Checked out"
    );
    Ok(record.into())
}

/// Handler for GET /attendance/history.
async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ListResponse<AttendanceView>>> {
    respond(Uuid::new_v4(), "attendance_history", history(&state, &headers, query))
}

fn history(
    state: &AppState,
    headers: &HeaderMap,
    query: HistoryQuery,
) -> EngineResult<ListResponse<AttendanceView>> {
    let employee = current_employee(state, headers, None)?;
    let range = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => DateRange::new(start, end)?,
        (None, None) => DateRange::all(),
        _ => {
            return Err(EngineError::validation(
                "start_date",
                "start_date and end_date must be given together",
            ));
        }
    };
    let limit = query
        .limit
        .unwrap_or(state.config().config().attendance.history_limit);

    let records = state.store().find_attendance_range(&employee.id, range)?;
    Ok(records
        .into_iter()
        .take(limit)
        .map(AttendanceView::from)
        .collect::<Vec<_>>()
        .into())
}

/// Handler for GET /attendance/summary.
async fn summary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    respond(Uuid::new_v4(), "attendance_summary", summary(&state, &headers, query))
}

fn summary(state: &AppState, headers: &HeaderMap, query: PeriodQuery) -> EngineResult<SummaryResponse> {
    let caller = current_employee(state, headers, None)?;
    let employee_id = match query.employee_id {
        Some(id) if id != caller.id => {
            ensure_self_or(&caller, &id, REVIEWER_ROLES)?;
            find_employee(state, &id)?.id
        }
        _ => caller.id.clone(),
    };
    let period = requested_period(state, query.month, query.year)?;

    let records = state
        .store()
        .find_attendance_range(&employee_id, DateRange::for_period(period)?)?;

    Ok(SummaryResponse {
        employee_id,
        period,
        summary: summarize(&records),
    })
}

// =============================================================================
// Leave
// =============================================================================

/// Handler for POST /leaves.
async fn apply_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LeaveRequest>)> {
    let correlation_id = Uuid::new_v4();
    let employee = authenticate(&state, &headers, None, correlation_id, "apply_leave")?;
    let application = parse_body(payload, correlation_id)?;
    created(respond(
        correlation_id,
        "apply_leave",
        apply_leave(&state, &employee, application),
    ))
}

fn apply_leave(
    state: &AppState,
    employee: &Employee,
    application: LeaveApplication,
) -> EngineResult<LeaveRequest> {
    let leave = LeaveRequest::new(
        &employee.id,
        application.leave_type,
        application.start_date,
        application.end_date,
        &application.reason,
        state.now(),
    )?;
    state.store().save_leave(leave)
}

/// Handler for GET /leaves.
async fn own_leaves_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListResponse<LeaveRequest>>> {
    let result = current_employee(&state, &headers, None)
        .and_then(|employee| state.store().leaves_for_employee(&employee.id))
        .map(ListResponse::from);
    respond(Uuid::new_v4(), "own_leaves", result)
}

/// Handler for GET /leaves/pending.
async fn pending_leaves_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListResponse<LeaveView>>> {
    respond(Uuid::new_v4(), "pending_leaves", pending_leaves(&state, &headers))
}

fn pending_leaves(state: &AppState, headers: &HeaderMap) -> EngineResult<ListResponse<LeaveView>> {
    current_employee(state, headers, Some(REVIEWER_ROLES))?;
    let store = state.store();

    let mut views = Vec::new();
    for leave in store.pending_leaves()? {
        let employee_name = store
            .find_employee(&leave.employee_id)?
            .map(|e| e.full_name());
        views.push(LeaveView {
            leave,
            employee_name,
        });
    }
    Ok(views.into())
}

/// Handler for PUT /leaves/:id.
async fn review_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<LeaveReview>, JsonRejection>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let reviewer = authenticate(
        &state,
        &headers,
        Some(REVIEWER_ROLES),
        correlation_id,
        "review_leave",
    )?;
    let review = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "review_leave",
        review_leave(&state, &reviewer, &id, review),
    )
}

fn find_leave(state: &AppState, id: &str) -> EngineResult<LeaveRequest> {
    state
        .store()
        .find_leave(parse_id("Leave request", id)?)?
        .ok_or_else(|| EngineError::not_found("Leave request", id))
}

fn review_leave(
    state: &AppState,
    reviewer: &Employee,
    id: &str,
    review: LeaveReview,
) -> EngineResult<LeaveRequest> {
    let leave = find_leave(state, id)?;
    let reviewed = leave.review(&reviewer.id, review.status, review.review_comments, state.now())?;
    state.store().save_leave(reviewed)
}

/// Handler for PUT /leaves/:id/dates.
async fn reschedule_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<LeaveDates>, JsonRejection>,
) -> ApiResult<Json<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let employee = authenticate(&state, &headers, None, correlation_id, "reschedule_leave")?;
    let dates = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "reschedule_leave",
        reschedule_leave(&state, &employee, &id, dates),
    )
}

/// Only the applicant may move their own request, and only while pending.
fn reschedule_leave(
    state: &AppState,
    employee: &Employee,
    id: &str,
    dates: LeaveDates,
) -> EngineResult<LeaveRequest> {
    let leave = find_leave(state, id)?;
    if leave.employee_id != employee.id {
        return Err(EngineError::not_found("Leave request", id));
    }
    let rescheduled = leave.reschedule(dates.start_date, dates.end_date)?;
    state.store().save_leave(rescheduled)
}

// =============================================================================
// Employees
// =============================================================================

/// Handler for GET /employees.
async fn list_employees_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EmployeeQuery>,
) -> ApiResult<Json<PageResponse<Employee>>> {
    respond(Uuid::new_v4(), "list_employees", list_employees(&state, &headers, query))
}

fn list_employees(
    state: &AppState,
    headers: &HeaderMap,
    query: EmployeeQuery,
) -> EngineResult<PageResponse<Employee>> {
    current_employee(state, headers, Some(REVIEWER_ROLES))?;
    let active = match query.status.as_deref() {
        None | Some("active") => Some(true),
        Some("inactive") => Some(false),
        Some("all") => None,
        Some(other) => {
            return Err(EngineError::validation(
                "status",
                format!("expected active, inactive or all, got '{}'", other),
            ));
        }
    };
    let filter = EmployeeFilter {
        department: query.department,
        active,
    };

    let employees = state.store().list_employees(&filter)?;
    Ok(PageResponse::paginate(
        employees,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    ))
}

/// Handler for POST /employees.
async fn register_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RegisterEmployee>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisteredEmployee>)> {
    let correlation_id = Uuid::new_v4();
    authenticate(
        &state,
        &headers,
        Some(ADMIN_ONLY),
        correlation_id,
        "register_employee",
    )?;
    let request = parse_body(payload, correlation_id)?;
    created(respond(
        correlation_id,
        "register_employee",
        register_employee(&state, request),
    ))
}

/// Stores the employee and issues the token they sign in with.
fn register_employee(state: &AppState, request: RegisterEmployee) -> EngineResult<RegisteredEmployee> {
    let config = state.config().config();
    let store = state.store();

    if !request.email.contains('@') {
        return Err(EngineError::validation("email", "must be an email address"));
    }
    if request.basic_salary.is_sign_negative() {
        return Err(EngineError::validation("basic_salary", "cannot be negative"));
    }
    let work_schedule = request
        .work_schedule
        .clone()
        .unwrap_or_else(|| config.attendance.default_schedule.clone());
    work_schedule.validate()?;

    let id = match request.id.clone() {
        Some(id) => id,
        None => Employee::generate_id(state.now().year(), store.employee_count()? + 1),
    };
    let employee = Employee {
        id,
        email: request.email.to_lowercase(),
        compensation: request.compensation(),
        personal_info: request.personal_info,
        employment_info: EmploymentInfo {
            department: request.department,
            position: request.position,
            date_of_joining: request.date_of_joining,
            employment_type: request.employment_type,
            work_schedule,
        },
        role: request.role,
        is_active: true,
        leave_balance: request
            .leave_balance
            .unwrap_or(config.leave.default_balances),
    };
    let employee = store.insert_employee(employee)?;
    let token = state.credentials().issue(&employee.id)?;
    Ok(RegisteredEmployee { employee, token })
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let result = current_employee(&state, &headers, None)
        .and_then(|caller| ensure_self_or(&caller, &id, REVIEWER_ROLES))
        .and_then(|_| find_employee(&state, &id));
    respond(Uuid::new_v4(), "get_employee", result)
}

/// Handler for DELETE /employees/:id.
///
/// Employees are deactivated rather than removed, so their attendance,
/// leave and payroll history stays intact.
async fn deactivate_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let result = current_employee(&state, &headers, Some(ADMIN_ONLY))
        .and_then(|_| find_employee(&state, &id))
        .and_then(|mut employee| {
            employee.is_active = false;
            state.store().update_employee(employee)
        });
    respond(Uuid::new_v4(), "deactivate_employee", result)
}

// =============================================================================
// Payroll
// =============================================================================

/// Handler for GET /payroll.
async fn list_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<ListResponse<PayrollRecord>>> {
    let result = current_employee(&state, &headers, Some(REVIEWER_ROLES))
        .and_then(|_| state.store().list_payroll(query.month, query.year))
        .map(ListResponse::from);
    respond(Uuid::new_v4(), "list_payroll", result)
}

/// Handler for GET /payroll/employee/:id.
async fn employee_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<ListResponse<PayrollRecord>>> {
    let result = current_employee(&state, &headers, None)
        .and_then(|caller| ensure_self_or(&caller, &id, REVIEWER_ROLES))
        .and_then(|_| state.store().payroll_for_employee(&id))
        .map(ListResponse::from);
    respond(Uuid::new_v4(), "employee_payroll", result)
}

/// Handler for POST /payroll.
async fn draft_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DraftPayrollRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PayrollRecord>)> {
    let correlation_id = Uuid::new_v4();
    authenticate(
        &state,
        &headers,
        Some(REVIEWER_ROLES),
        correlation_id,
        "draft_payroll",
    )?;
    let request = parse_body(payload, correlation_id)?;
    created(respond(
        correlation_id,
        "draft_payroll",
        draft(&state, request, correlation_id),
    ))
}

fn draft(
    state: &AppState,
    request: DraftPayrollRequest,
    correlation_id: Uuid,
) -> EngineResult<PayrollRecord> {
    let employee = find_employee(state, &request.employee_id)?;
    let period = PayPeriod::new(request.month, request.year)?;
    let store = state.store();

    let records = store.find_attendance_range(&employee.id, DateRange::for_period(period)?)?;
    let summary = summarize(&records);
    let record = draft_payroll(&employee, period, &summary, &request.adjustments)?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        month = period.month,
        year = period.year,
        gross_salary = %record.gross_salary,
        net_salary = %record.net_salary,
        "Drafted payroll"
    );
    store.save_payroll(record)
}

/// Handler for PUT /payroll/:id/status.
async fn payroll_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<PayrollStatusUpdate>, JsonRejection>,
) -> ApiResult<Json<PayrollRecord>> {
    let correlation_id = Uuid::new_v4();
    let caller = authenticate(
        &state,
        &headers,
        Some(REVIEWER_ROLES),
        correlation_id,
        "advance_payroll",
    )?;
    let update = parse_body(payload, correlation_id)?;
    respond(
        correlation_id,
        "advance_payroll",
        advance_payroll(&state, &caller, &id, update),
    )
}

fn advance_payroll(
    state: &AppState,
    caller: &Employee,
    id: &str,
    update: PayrollStatusUpdate,
) -> EngineResult<PayrollRecord> {
    let store = state.store();
    let record = store
        .find_payroll(parse_id("Payroll", id)?)?
        .ok_or_else(|| EngineError::not_found("Payroll", id))?;

    let advanced = record.advance(update.status, &caller.id, state.now())?;
    store.save_payroll(advanced)
}
