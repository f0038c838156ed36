//! Calculation logic for the HR operations engine.
//!
//! This module contains the business rules: date/time arithmetic, the
//! attendance rule engine (lateness, working hours, overtime and status),
//! attendance summary aggregation, leave duration and payroll aggregation.
//! Every function is synchronous and performs no I/O.

mod attendance_rules;
mod leave_duration;
mod payroll;
mod summary;
mod time;

pub use attendance_rules::{apply_check_in, apply_check_out, late_minutes, refresh_derived};
pub use leave_duration::leave_total_days;
pub use payroll::{PayrollAdjustments, PayrollTotals, compute_payroll, draft_payroll};
pub use summary::summarize;
pub use time::{
    diff_minutes, local_time, minutes_to_hours, month_bounds, parse_hh_mm, round2, start_of_day,
};
