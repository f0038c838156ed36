//! Request types for the HR operations API.
//!
//! JSON bodies and query strings accepted by the handlers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::PayrollAdjustments;
use crate::models::{
    Allowances, Compensation, EmploymentType, LeaveBalance, LeaveStatus, LeaveType,
    PayrollStatus, PersonalInfo, Role, StandingDeductions, WorkSchedule,
};

/// Body of `POST /attendance/checkin` and `POST /attendance/checkout`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PunchRequest {
    /// Free-text remarks stored with the punch.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Notes for the day's record, replacing any earlier notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query of `GET /attendance/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// First day (inclusive). Requires `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Last day (inclusive). Requires `start_date`.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

/// Query selecting a month, used by the summary and payroll listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    /// Month, 1-12. Defaults to the current month.
    pub month: Option<u32>,
    /// Year. Defaults to the current year.
    pub year: Option<i32>,
    /// Employee to summarize. Defaults to the caller; others require a
    /// manager or admin.
    pub employee_id: Option<String>,
}

/// Body of `POST /leaves`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Reason for the leave.
    pub reason: String,
}

/// Body of `PUT /leaves/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveReview {
    /// `approved` or `rejected`.
    pub status: LeaveStatus,
    /// Reviewer comments.
    #[serde(default)]
    pub review_comments: Option<String>,
}

/// Body of `PUT /leaves/:id/dates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDates {
    /// New first day of leave (inclusive).
    pub start_date: NaiveDate,
    /// New last day of leave (inclusive).
    pub end_date: NaiveDate,
}

/// Query of `GET /employees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Only employees in this department.
    pub department: Option<String>,
    /// `active` (default) or `inactive`.
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

/// Body of `POST /employees`.
///
/// Omitted id, schedule and leave balance come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEmployee {
    /// Employee id. Generated as `EMP{year}{seq:04}` when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// Work email address.
    pub email: String,
    /// Personal details.
    pub personal_info: PersonalInfo,
    /// Department name.
    pub department: String,
    /// Job title.
    pub position: String,
    /// First day of employment.
    pub date_of_joining: NaiveDate,
    /// Employment arrangement.
    #[serde(default)]
    pub employment_type: EmploymentType,
    /// Work schedule.
    #[serde(default)]
    pub work_schedule: Option<WorkSchedule>,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Monthly allowances.
    #[serde(default)]
    pub allowances: Allowances,
    /// Monthly standing deductions.
    #[serde(default)]
    pub deductions: StandingDeductions,
    /// Access level.
    #[serde(default)]
    pub role: Role,
    /// Opening leave balance.
    #[serde(default)]
    pub leave_balance: Option<LeaveBalance>,
}

impl RegisterEmployee {
    /// The compensation structure described by the request.
    pub fn compensation(&self) -> Compensation {
        Compensation {
            basic_salary: self.basic_salary,
            allowances: self.allowances.clone(),
            deductions: self.deductions.clone(),
        }
    }
}

/// Body of `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPayrollRequest {
    /// Employee to pay.
    pub employee_id: String,
    /// Month, 1-12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// One-off amounts for the period.
    #[serde(flatten)]
    pub adjustments: PayrollAdjustments,
}

/// Body of `PUT /payroll/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollStatusUpdate {
    /// `approved` or `paid`.
    pub status: PayrollStatus,
}
