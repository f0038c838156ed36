//! Leave duration calculation.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

/// Number of days covered by a leave request, counting both ends.
///
/// # Errors
///
/// Returns `InvalidRange` when `end` is before `start`.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::leave_total_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// assert_eq!(leave_total_days(start, end).unwrap(), 3);
/// ```
pub fn leave_total_days(start: NaiveDate, end: NaiveDate) -> EngineResult<i64> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_one() {
        assert_eq!(leave_total_days(date(2024, 5, 6), date(2024, 5, 6)).unwrap(), 1);
    }

    #[test]
    fn test_spans_month_and_leap_day() {
        assert_eq!(
            leave_total_days(date(2024, 2, 27), date(2024, 3, 2)).unwrap(),
            5
        );
    }

    #[test]
    fn test_spans_year_end() {
        assert_eq!(
            leave_total_days(date(2023, 12, 30), date(2024, 1, 2)).unwrap(),
            4
        );
    }

    #[test]
    fn test_reversed_range_fails() {
        let result = leave_total_days(date(2024, 1, 3), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(EngineError::InvalidRange { start, end })
                if start == date(2024, 1, 3) && end == date(2024, 1, 1)
        ));
    }

    proptest! {
        #[test]
        fn prop_total_days_is_span_plus_one(offset in 0i64..1000) {
            let start = date(2024, 1, 1);
            let end = start + chrono::Duration::days(offset);
            prop_assert_eq!(leave_total_days(start, end).unwrap(), offset + 1);
        }
    }
}
