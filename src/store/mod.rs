//! Persistence collaborator for the HR operations engine.
//!
//! The rule engine never touches storage itself. Handlers load records
//! through the repository traits defined here, run the pure rules, and save
//! the result. [`InMemoryStore`] implements every repository and enforces the
//! uniqueness keys: one attendance record per `(employee_id, date)` and one
//! payroll record per `(employee_id, month, year)`.

mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Employee, LeaveRequest, PayPeriod, PayrollRecord};

pub use memory::InMemoryStore;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering every representable day.
    pub fn all() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    /// The calendar days of a pay period.
    pub fn for_period(period: PayPeriod) -> EngineResult<Self> {
        let (start, end) = period.bounds()?;
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Filter for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Only employees in this department.
    pub department: Option<String>,
    /// Only active (`true`) or deactivated (`false`) employees.
    pub active: Option<bool>,
}

/// Employee records.
pub trait EmployeeRepository {
    /// Looks up an employee by id.
    fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Lists employees matching the filter, ordered by first name.
    fn list_employees(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Employee>>;

    /// Adds a new employee. Fails with `DuplicateKey` if the id or email is
    /// already registered.
    fn insert_employee(&self, employee: Employee) -> EngineResult<Employee>;

    /// Replaces an existing employee. Fails with `NotFound` if absent.
    fn update_employee(&self, employee: Employee) -> EngineResult<Employee>;

    /// Number of registered employees.
    fn employee_count(&self) -> EngineResult<usize>;
}

/// Attendance records.
pub trait AttendanceRepository {
    /// Looks up the record for an employee and day.
    fn find_attendance(&self, employee_id: &str, day: NaiveDate)
    -> EngineResult<Option<AttendanceRecord>>;

    /// Records of an employee within a range, newest first.
    fn find_attendance_range(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Inserts or replaces a record. Fails with `DuplicateKey` if a
    /// different record already exists for the same employee and day.
    fn save_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord>;
}

/// Leave requests.
pub trait LeaveRepository {
    /// Looks up a leave request by id.
    fn find_leave(&self, id: Uuid) -> EngineResult<Option<LeaveRequest>>;

    /// Leave requests of an employee, most recently applied first.
    fn leaves_for_employee(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>>;

    /// All pending leave requests, most recently applied first.
    fn pending_leaves(&self) -> EngineResult<Vec<LeaveRequest>>;

    /// Inserts or replaces a leave request.
    fn save_leave(&self, leave: LeaveRequest) -> EngineResult<LeaveRequest>;
}

/// Payroll records.
pub trait PayrollRepository {
    /// Looks up a payroll record by id.
    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>>;

    /// Payroll records filtered by month and/or year, newest period first.
    fn list_payroll(&self, month: Option<u32>, year: Option<i32>)
    -> EngineResult<Vec<PayrollRecord>>;

    /// Payroll records of an employee, newest period first.
    fn payroll_for_employee(&self, employee_id: &str) -> EngineResult<Vec<PayrollRecord>>;

    /// Inserts or replaces a record. Fails with `DuplicateKey` if a
    /// different record already exists for the same employee and period.
    fn save_payroll(&self, record: PayrollRecord) -> EngineResult<PayrollRecord>;
}
