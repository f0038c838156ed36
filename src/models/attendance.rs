//! Attendance record model.
//!
//! An [`AttendanceRecord`] tracks one employee's check-in, check-out and the
//! fields derived from them for a single calendar day.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::diff_minutes;
use crate::error::{EngineError, EngineResult};

/// Maximum length of the free-text notes on a record.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Attendance outcome for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked the day, on time.
    Present,
    /// No attendance.
    #[default]
    Absent,
    /// Worked the day but checked in after the scheduled start.
    Late,
    /// Worked at least half of the scheduled hours.
    #[serde(rename = "half-day")]
    HalfDay,
    /// Public or company holiday.
    Holiday,
    /// On approved leave.
    Leave,
}

impl AttendanceStatus {
    /// Returns true for statuses counted as a present day.
    pub fn counts_as_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// A check-in or check-out event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Local time of the event.
    pub time: NaiveDateTime,
    /// Optional remarks entered by the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Scheduled and actual working hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Standard hours for the day.
    pub scheduled: Decimal,
    /// Hours between check-in and check-out, rounded to 2 places.
    pub actual: Decimal,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            scheduled: Decimal::from(8),
            actual: Decimal::ZERO,
        }
    }
}

/// Overtime worked on the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtime {
    /// Hours beyond the scheduled hours.
    pub hours: Decimal,
    /// Whether a manager approved the overtime.
    #[serde(default)]
    pub approved: bool,
    /// The approving manager, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

/// One employee's attendance for one calendar day.
///
/// Records are unique per `(employee_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Owning employee.
    pub employee_id: String,
    /// Calendar day this record covers.
    pub date: NaiveDate,
    /// Check-in event, once recorded.
    pub check_in: Option<Punch>,
    /// Check-out event, once recorded.
    pub check_out: Option<Punch>,
    /// Scheduled and actual working hours.
    pub working_hours: WorkingHours,
    /// Overtime worked.
    pub overtime: Overtime,
    /// Attendance outcome.
    pub status: AttendanceStatus,
    /// Whether the check-in was after the scheduled start.
    pub is_late: bool,
    /// Minutes between scheduled start and check-in.
    pub late_minutes: i64,
    /// Whether the employee left before the scheduled end.
    pub is_early_leave: bool,
    /// Minutes between check-out and scheduled end.
    pub early_leave_minutes: i64,
    /// Whether the record was entered by an administrator.
    #[serde(default)]
    pub is_manual_entry: bool,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Creates an absent record for the given employee and day.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::{AttendanceRecord, AttendanceStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    /// let record = AttendanceRecord::new("EMP20240001", day, Decimal::from(8));
    /// assert_eq!(record.status, AttendanceStatus::Absent);
    /// assert_eq!(record.working_hours.actual, Decimal::ZERO);
    /// ```
    pub fn new(employee_id: &str, date: NaiveDate, scheduled_hours: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            date,
            check_in: None,
            check_out: None,
            working_hours: WorkingHours {
                scheduled: scheduled_hours,
                actual: Decimal::ZERO,
            },
            overtime: Overtime::default(),
            status: AttendanceStatus::Absent,
            is_late: false,
            late_minutes: 0,
            is_early_leave: false,
            early_leave_minutes: 0,
            is_manual_entry: false,
            notes: None,
        }
    }

    /// Check-in time, if recorded.
    pub fn check_in_time(&self) -> Option<NaiveDateTime> {
        self.check_in.as_ref().map(|p| p.time)
    }

    /// Check-out time, if recorded.
    pub fn check_out_time(&self) -> Option<NaiveDateTime> {
        self.check_out.as_ref().map(|p| p.time)
    }

    /// Time between check-in and check-out formatted as `"{h}h {m}m"`.
    ///
    /// Returns `"0h 0m"` until both events are recorded.
    pub fn work_duration(&self) -> String {
        match (self.check_in_time(), self.check_out_time()) {
            (Some(start), Some(end)) => {
                let minutes = diff_minutes(start, end);
                format!("{}h {}m", minutes / 60, minutes % 60)
            }
            _ => "0h 0m".to_string(),
        }
    }

    /// Returns a copy of the record carrying `notes`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the notes exceed 500 characters.
    pub fn annotate(&self, notes: &str) -> EngineResult<Self> {
        if notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(EngineError::validation(
                "notes",
                format!("cannot exceed {} characters", MAX_NOTES_LENGTH),
            ));
        }
        let mut annotated = self.clone();
        annotated.notes = Some(notes.to_string());
        Ok(annotated)
    }
}
