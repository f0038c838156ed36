//! Date and time helpers shared by the attendance and payroll rules.
//!
//! All rule functions work on local wall-clock time ([`NaiveDateTime`]) in
//! the deployment's reference timezone; [`local_time`] converts an instant
//! into that representation.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Converts an instant into local wall-clock time at the given offset.
pub fn local_time(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    instant.with_timezone(&offset).naive_local()
}

/// Returns the calendar day of a local time.
///
/// This is the key attendance records are unique on.
pub fn start_of_day(instant: NaiveDateTime) -> NaiveDate {
    instant.date()
}

/// Whole minutes from `a` to `b`, truncated toward zero. Negative when `b`
/// is before `a`.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::diff_minutes;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let a = day.and_hms_opt(9, 0, 0).unwrap();
/// let b = day.and_hms_opt(9, 30, 59).unwrap();
/// assert_eq!(diff_minutes(a, b), 30);
/// assert_eq!(diff_minutes(b, a), -30);
/// ```
pub fn diff_minutes(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    (b - a).num_minutes()
}

/// Returns the first and last calendar days of a month.
///
/// # Errors
///
/// Returns `InvalidPeriod` when `month` is outside 1-12 or the year is out
/// of chrono's range.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (first, last) = month_bounds(2023, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidPeriod { month, year };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Parses a 24-hour `HH:MM` string into `(hour, minute)`.
pub fn parse_hh_mm(value: &str) -> EngineResult<(u32, u32)> {
    let invalid = || EngineError::InvalidSchedule {
        value: value.to_string(),
    };

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())?;
    Ok((time.hour(), time.minute()))
}

/// Rounds to 2 decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("8.125").unwrap()), Decimal::from_str("8.13").unwrap());
/// assert_eq!(round2(Decimal::from_str("8.124").unwrap()), Decimal::from_str("8.12").unwrap());
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts whole minutes into hours, rounded to 2 places.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    round2(Decimal::from(minutes) / Decimal::from(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_start_of_day_truncates_time() {
        assert_eq!(
            start_of_day(dt("2024-01-15 23:59:59")),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_local_time_applies_offset() {
        let instant = DateTime::parse_from_rfc3339("2024-01-15T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let local = local_time(instant, ist);
        assert_eq!(local, dt("2024-01-16 01:30:00"));
        assert_eq!(
            start_of_day(local),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn test_diff_minutes_truncates_seconds() {
        assert_eq!(
            diff_minutes(dt("2024-01-15 09:00:00"), dt("2024-01-15 09:00:59")),
            0
        );
        assert_eq!(
            diff_minutes(dt("2024-01-15 09:00:00"), dt("2024-01-15 18:00:00")),
            540
        );
    }

    #[test]
    fn test_diff_minutes_across_midnight() {
        assert_eq!(
            diff_minutes(dt("2024-01-15 22:00:00"), dt("2024-01-16 06:15:00")),
            495
        );
    }

    #[test]
    fn test_month_bounds_lengths() {
        let last_day = |y, m| month_bounds(y, m).unwrap().1;
        assert_eq!(last_day(2024, 1), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(last_day(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(last_day(2100, 2), NaiveDate::from_ymd_opt(2100, 2, 28).unwrap());
        assert_eq!(last_day(2024, 4), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        assert_eq!(last_day(2024, 12), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_invalid_month() {
        assert!(matches!(
            month_bounds(2024, 13),
            Err(EngineError::InvalidPeriod { month: 13, year: 2024 })
        ));
        assert!(month_bounds(2024, 0).is_err());
    }

    #[test]
    fn test_parse_hh_mm() {
        assert_eq!(parse_hh_mm("09:00").unwrap(), (9, 0));
        assert_eq!(parse_hh_mm("23:59").unwrap(), (23, 59));
        assert_eq!(parse_hh_mm("00:00").unwrap(), (0, 0));
    }

    #[test]
    fn test_parse_hh_mm_rejects_malformed() {
        for value in ["9:00", "24:00", "12:60", "0900", "", "ab:cd", "09:00:00"] {
            assert!(
                matches!(parse_hh_mm(value), Err(EngineError::InvalidSchedule { .. })),
                "expected {:?} to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(dec("1.005")), dec("1.01"));
        assert_eq!(round2(dec("1.004")), dec("1.00"));
        assert_eq!(round2(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(570), dec("9.5"));
        assert_eq!(minutes_to_hours(500), dec("8.33"));
        assert_eq!(minutes_to_hours(0), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_month_bounds_spans_one_month(year in 1900i32..2200, month in 1u32..=12) {
            let (first, last) = month_bounds(year, month).unwrap();
            let days = (last - first).num_days() + 1;
            prop_assert!((28..=31).contains(&days));
            prop_assert_eq!(last.succ_opt().unwrap().day0(), 0);
        }

        #[test]
        fn prop_diff_minutes_is_antisymmetric(offset in -10_000i64..10_000) {
            let a = dt("2024-06-01 12:00:00");
            let b = a + chrono::Duration::minutes(offset);
            prop_assert_eq!(diff_minutes(a, b), offset);
            prop_assert_eq!(diff_minutes(b, a), -offset);
        }
    }
}
