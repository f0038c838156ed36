//! Employee model and related types.
//!
//! This module defines the Employee struct together with its work schedule,
//! compensation structure, role and leave balances.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_hh_mm;
use crate::error::EngineResult;

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent employment.
    #[default]
    Permanent,
    /// Fixed-term contract.
    Contract,
    /// Internship.
    Intern,
}

/// Access level of an employee within the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee: own records only.
    #[default]
    Employee,
    /// Manager: reviews leave and payroll.
    Manager,
    /// Administrator: full access.
    Admin,
}

impl Role {
    /// Returns the lowercase name used in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

/// Roles allowed to review leave and manage payroll.
pub const REVIEWER_ROLES: &[Role] = &[Role::Manager, Role::Admin];

/// Personal details of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Date of birth, if recorded.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Daily work schedule.
///
/// `start_time` and `end_time` are 24-hour `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Scheduled start of the working day.
    pub start_time: String,
    /// Scheduled end of the working day.
    pub end_time: String,
    /// Days of the week the employee is expected to work.
    #[serde(default)]
    pub working_days: Vec<Weekday>,
}

impl WorkSchedule {
    /// Parses the scheduled start into an `(hour, minute)` pair.
    pub fn start(&self) -> EngineResult<(u32, u32)> {
        parse_hh_mm(&self.start_time)
    }

    /// Checks that both schedule times are well-formed.
    pub fn validate(&self) -> EngineResult<()> {
        parse_hh_mm(&self.start_time)?;
        parse_hh_mm(&self.end_time)?;
        Ok(())
    }
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            start_time: "09:00".to_string(),
            end_time: "18:00".to_string(),
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// Employment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentInfo {
    /// Department name.
    pub department: String,
    /// Job title.
    pub position: String,
    /// First day of employment.
    pub date_of_joining: NaiveDate,
    /// The type of employment arrangement.
    #[serde(default)]
    pub employment_type: EmploymentType,
    /// The daily work schedule.
    #[serde(default)]
    pub work_schedule: WorkSchedule,
}

/// Monthly allowances paid on top of basic salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Medical allowance.
    #[serde(default)]
    pub medical: Decimal,
}

/// Standing monthly deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingDeductions {
    /// Provident fund contribution.
    #[serde(default)]
    pub pf: Decimal,
    /// Employee state insurance contribution.
    #[serde(default)]
    pub esi: Decimal,
    /// Income tax withheld.
    #[serde(default)]
    pub tax: Decimal,
}

/// Compensation structure of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensation {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Monthly allowances.
    #[serde(default)]
    pub allowances: Allowances,
    /// Standing monthly deductions.
    #[serde(default)]
    pub deductions: StandingDeductions,
}

impl Compensation {
    /// Basic salary plus all allowances.
    pub fn gross_salary(&self) -> Decimal {
        self.basic_salary + self.allowances.hra + self.allowances.transport + self.allowances.medical
    }

    /// Sum of the standing deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.pf + self.deductions.esi + self.deductions.tax
    }

    /// Gross salary less standing deductions.
    pub fn net_salary(&self) -> Decimal {
        self.gross_salary() - self.total_deductions()
    }
}

/// Remaining leave days per leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Casual leave days.
    pub casual: u32,
    /// Sick leave days.
    pub sick: u32,
    /// Earned leave days.
    pub earned: u32,
}

impl Default for LeaveBalance {
    fn default() -> Self {
        Self {
            casual: 12,
            sick: 12,
            earned: 21,
        }
    }
}

/// Represents an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g. "EMP20240001").
    pub id: String,
    /// Work email address.
    pub email: String,
    /// Personal details.
    pub personal_info: PersonalInfo,
    /// Employment details, including the work schedule.
    pub employment_info: EmploymentInfo,
    /// Compensation structure.
    pub compensation: Compensation,
    /// Access level.
    #[serde(default)]
    pub role: Role,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Remaining leave days.
    #[serde(default)]
    pub leave_balance: LeaveBalance,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the employee's display name.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name, self.personal_info.last_name
        )
    }

    /// Returns the employee's work schedule.
    pub fn schedule(&self) -> &WorkSchedule {
        &self.employment_info.work_schedule
    }

    /// Returns true if the employee holds one of the given roles.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Generates an employee id of the form `EMP{year}{seq:04}`.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::Employee;
    ///
    /// assert_eq!(Employee::generate_id(2024, 7), "EMP20240007");
    /// ```
    pub fn generate_id(year: i32, sequence: usize) -> String {
        format!("EMP{}{:04}", year, sequence)
    }
}
