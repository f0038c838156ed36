//! Core data models for the HR operations engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod leave;
mod payroll;
mod summary;

#[cfg(test)]
pub(crate) use employee::fixtures;

pub use attendance::{
    AttendanceRecord, AttendanceStatus, MAX_NOTES_LENGTH, Overtime, Punch, WorkingHours,
};
pub use employee::{
    Allowances, Compensation, Employee, EmploymentInfo, EmploymentType, LeaveBalance,
    PersonalInfo, REVIEWER_ROLES, Role, StandingDeductions, WorkSchedule,
};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType, MAX_LEAVE_TEXT_LENGTH};
pub use payroll::{
    AttendanceSnapshot, Deductions, Earnings, PayPeriod, PayrollRecord, PayrollStatus,
};
pub use summary::AttendanceSummary;
