//! Attendance summary model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals and rates over a set of attendance records.
///
/// `present_days` includes late days, which are also counted in
/// `late_days`. `total_days` is the number of records, not the number of
/// calendar days in the queried range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Number of records.
    pub total_days: u32,
    /// Records with status present or late.
    pub present_days: u32,
    /// Records with status absent.
    pub absent_days: u32,
    /// Records with status late.
    pub late_days: u32,
    /// Records with status half-day.
    pub half_days: u32,
    /// Records with status leave.
    pub leave_days: u32,
    /// Sum of actual working hours.
    pub total_hours: Decimal,
    /// Sum of overtime hours.
    pub total_overtime_hours: Decimal,
    /// Total hours per present day, rounded to 2 places.
    pub average_working_hours: Decimal,
    /// Present days as a percentage of records, rounded to 2 places.
    pub attendance_percentage: Decimal,
}
