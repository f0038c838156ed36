//! Attendance rule engine.
//!
//! Check-in determines lateness against the employee's scheduled start for
//! the calendar day. Check-out records the end of the day and triggers
//! [`refresh_derived`], which computes actual hours, overtime and the final
//! status. Every function here is pure: it returns a new record and never
//! modifies its input, so a rejected operation leaves the stored record
//! untouched.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::config::AttendanceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, Employee, Punch};

use super::time::{diff_minutes, minutes_to_hours, parse_hh_mm, round2, start_of_day};

/// Minutes the employee checked in after the scheduled start, never negative.
///
/// The scheduled start is `now`'s calendar day at the employee's
/// `start_time`, second zero.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::late_minutes;
/// use chrono::NaiveDateTime;
///
/// let now = NaiveDateTime::parse_from_str("2024-01-15 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(late_minutes("09:00", now).unwrap(), 30);
/// assert_eq!(late_minutes("10:00", now).unwrap(), 0);
/// ```
pub fn late_minutes(start_time: &str, now: NaiveDateTime) -> EngineResult<i64> {
    let (hour, minute) = parse_hh_mm(start_time)?;
    let scheduled_start = start_of_day(now)
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| EngineError::InvalidSchedule {
            value: start_time.to_string(),
        })?;

    Ok(diff_minutes(scheduled_start, now).max(0))
}

/// Records a check-in for the day of `now`.
///
/// If `existing` is `None` a new absent record is created first with the
/// configured default scheduled hours. The scheduled hours are a fixed daily
/// standard and are not derived from the employee's start and end times.
///
/// # Errors
///
/// - `AlreadyCheckedIn` if the existing record already has a check-in
/// - `InvalidSchedule` if the employee's start time is malformed
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::apply_check_in;
/// use hrms_engine::config::AttendanceConfig;
/// use hrms_engine::models::{AttendanceStatus, Employee};
/// use chrono::NaiveDateTime;
///
/// # let employee: Employee = serde_json::from_value(serde_json::json!({
/// #     "id": "EMP20240001", "email": "a@example.com",
/// #     "personal_info": {"first_name": "A", "last_name": "B", "phone_number": "1"},
/// #     "employment_info": {"department": "Ops", "position": "Clerk", "date_of_joining": "2024-01-01"},
/// #     "compensation": {"basic_salary": "30000"}
/// # })).unwrap();
/// let now = NaiveDateTime::parse_from_str("2024-01-15 09:12:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let record = apply_check_in(None, &employee, now, None, &AttendanceConfig::default()).unwrap();
///
/// assert!(record.is_late);
/// assert_eq!(record.late_minutes, 12);
/// assert_eq!(record.status, AttendanceStatus::Late);
/// ```
pub fn apply_check_in(
    existing: Option<&AttendanceRecord>,
    employee: &Employee,
    now: NaiveDateTime,
    remarks: Option<String>,
    config: &AttendanceConfig,
) -> EngineResult<AttendanceRecord> {
    let day = start_of_day(now);

    if let Some(record) = existing {
        if record.check_in.is_some() {
            return Err(EngineError::AlreadyCheckedIn {
                employee_id: record.employee_id.clone(),
                date: record.date,
            });
        }
    }

    let late_minutes = late_minutes(&employee.schedule().start_time, now)?;
    let is_late = late_minutes > 0;

    let mut record = match existing {
        Some(record) => record.clone(),
        None => AttendanceRecord::new(&employee.id, day, config.default_scheduled_hours),
    };

    record.check_in = Some(Punch { time: now, remarks });
    record.status = if is_late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };
    record.is_late = is_late;
    record.late_minutes = late_minutes;

    Ok(refresh_derived(record))
}

/// Records a check-out and recomputes the derived fields.
///
/// # Errors
///
/// - `NotCheckedIn` if the record has no check-in
/// - `AlreadyCheckedOut` if the record already has a check-out
pub fn apply_check_out(
    record: &AttendanceRecord,
    now: NaiveDateTime,
    remarks: Option<String>,
) -> EngineResult<AttendanceRecord> {
    if record.check_in.is_none() {
        return Err(EngineError::NotCheckedIn {
            employee_id: record.employee_id.clone(),
            date: record.date,
        });
    }
    if record.check_out.is_some() {
        return Err(EngineError::AlreadyCheckedOut {
            employee_id: record.employee_id.clone(),
            date: record.date,
        });
    }

    let mut updated = record.clone();
    updated.check_out = Some(Punch { time: now, remarks });

    Ok(refresh_derived(updated))
}

/// Recomputes actual hours, overtime and status once both check-in and
/// check-out are present. Returns the record unchanged otherwise.
///
/// - `actual = round2(minutes / 60)`
/// - overtime is set only when the minutes exceed the scheduled minutes;
///   otherwise the previous overtime value is kept
/// - `actual >= scheduled` gives late or present depending on `is_late`;
///   `actual >= scheduled / 2` gives half-day; below that the status is
///   left as it was
///
/// Running it twice gives the same record.
pub fn refresh_derived(mut record: AttendanceRecord) -> AttendanceRecord {
    let (Some(check_in), Some(check_out)) = (record.check_in_time(), record.check_out_time())
    else {
        return record;
    };

    let total_minutes = diff_minutes(check_in, check_out);
    let scheduled = record.working_hours.scheduled;
    let actual = minutes_to_hours(total_minutes);
    record.working_hours.actual = actual;

    let scheduled_minutes = scheduled * Decimal::from(60);
    let worked_minutes = Decimal::from(total_minutes);
    if worked_minutes > scheduled_minutes {
        record.overtime.hours = round2((worked_minutes - scheduled_minutes) / Decimal::from(60));
    }

    if actual >= scheduled {
        record.status = if record.is_late {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
    } else if actual >= scheduled / Decimal::from(2) {
        record.status = AttendanceStatus::HalfDay;
    }

    record
}
