//! Attendance summary aggregation.
//!
//! Folds the attendance records of a date range into counts, hour totals and
//! rates. Only existing records count: a day without a record contributes to
//! neither the numerator nor the denominator of the attendance percentage.

use rust_decimal::Decimal;

use crate::models::{AttendanceRecord, AttendanceStatus, AttendanceSummary};

use super::time::round2;

/// Summarizes a set of attendance records.
///
/// Late records are counted both in `late_days` and in `present_days`.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::summarize;
/// use rust_decimal::Decimal;
///
/// let summary = summarize(&[]);
/// assert_eq!(summary.total_days, 0);
/// assert_eq!(summary.attendance_percentage, Decimal::ZERO);
/// ```
pub fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
    let count = |status: AttendanceStatus| {
        records.iter().filter(|r| r.status == status).count() as u32
    };

    let total_days = records.len() as u32;
    let present_days = records
        .iter()
        .filter(|r| r.status.counts_as_present())
        .count() as u32;
    let total_hours: Decimal = records.iter().map(|r| r.working_hours.actual).sum();
    let total_overtime_hours: Decimal = records.iter().map(|r| r.overtime.hours).sum();

    let average_working_hours = if present_days > 0 {
        round2(total_hours / Decimal::from(present_days))
    } else {
        Decimal::ZERO
    };

    let attendance_percentage = if total_days > 0 {
        round2(Decimal::from(present_days) * Decimal::from(100) / Decimal::from(total_days))
    } else {
        Decimal::ZERO
    };

    AttendanceSummary {
        total_days,
        present_days,
        absent_days: count(AttendanceStatus::Absent),
        late_days: count(AttendanceStatus::Late),
        half_days: count(AttendanceStatus::HalfDay),
        leave_days: count(AttendanceStatus::Leave),
        total_hours,
        total_overtime_hours,
        average_working_hours,
        attendance_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(day: u32, status: AttendanceStatus, actual: &str, overtime: &str) -> AttendanceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let mut record = AttendanceRecord::new("EMP20240001", date, dec("8"));
        record.status = status;
        record.working_hours.actual = dec(actual);
        record.overtime.hours = dec(overtime);
        record
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        assert_eq!(summarize(&[]), AttendanceSummary::default());
    }

    #[test]
    fn test_late_counts_as_present() {
        let mut records = Vec::new();
        for day in 1..=6 {
            records.push(record(day, AttendanceStatus::Present, "8", "0"));
        }
        records.push(record(7, AttendanceStatus::Late, "8", "0"));
        records.push(record(8, AttendanceStatus::Late, "8", "0"));
        records.push(record(9, AttendanceStatus::Absent, "0", "0"));
        records.push(record(10, AttendanceStatus::Absent, "0", "0"));

        let summary = summarize(&records);
        assert_eq!(summary.total_days, 10);
        assert_eq!(summary.present_days, 8);
        assert_eq!(summary.late_days, 2);
        assert_eq!(summary.absent_days, 2);
        assert_eq!(summary.attendance_percentage, dec("80.00"));
    }

    #[test]
    fn test_hours_and_average() {
        let records = vec![
            record(1, AttendanceStatus::Present, "9.5", "1.5"),
            record(2, AttendanceStatus::Late, "8.25", "0.25"),
            record(3, AttendanceStatus::HalfDay, "4.5", "0"),
            record(4, AttendanceStatus::Leave, "0", "0"),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total_hours, dec("22.25"));
        assert_eq!(summary.total_overtime_hours, dec("1.75"));
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.leave_days, 1);
        // Half-day hours count toward the total but not the divisor.
        assert_eq!(summary.average_working_hours, dec("11.13"));
        assert_eq!(summary.attendance_percentage, dec("50"));
    }

    #[test]
    fn test_no_present_days_gives_zero_average() {
        let records = vec![
            record(1, AttendanceStatus::HalfDay, "4", "0"),
            record(2, AttendanceStatus::Absent, "0", "0"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.average_working_hours, Decimal::ZERO);
        assert_eq!(summary.attendance_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_percentage_is_rounded() {
        let records = vec![
            record(1, AttendanceStatus::Present, "8", "0"),
            record(2, AttendanceStatus::Absent, "0", "0"),
            record(3, AttendanceStatus::Absent, "0", "0"),
        ];
        assert_eq!(summarize(&records).attendance_percentage, dec("33.33"));
    }

    #[test]
    fn test_holiday_counts_only_in_total() {
        let records = vec![
            record(1, AttendanceStatus::Holiday, "0", "0"),
            record(2, AttendanceStatus::Present, "8", "0"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.attendance_percentage, dec("50"));
    }

    fn any_status() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Late),
            Just(AttendanceStatus::HalfDay),
            Just(AttendanceStatus::Holiday),
            Just(AttendanceStatus::Leave),
        ]
    }

    proptest! {
        #[test]
        fn prop_counts_are_consistent(statuses in prop::collection::vec(any_status(), 0..40)) {
            let records: Vec<AttendanceRecord> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| record((i % 28) as u32 + 1, *s, "8", "0"))
                .collect();
            let summary = summarize(&records);

            prop_assert_eq!(summary.total_days as usize, records.len());
            prop_assert!(summary.late_days <= summary.present_days);
            prop_assert!(summary.present_days <= summary.total_days);
            prop_assert!(summary.attendance_percentage <= Decimal::from(100));
            prop_assert!(summary.attendance_percentage >= Decimal::ZERO);
        }
    }
}
