// Date-range helpers for the booking workflow

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("check-out must be later than check-in")]
    EmptyRange,
}

// Number of nights covered by the span, partial days counting as a full
// night. A non-positive span is rejected rather than producing a zero or
// negative night count.
pub fn nights_between(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> Result<u32, DateRangeError> {
    let seconds = check_out.signed_duration_since(check_in).num_seconds();
    if seconds <= 0 {
        return Err(DateRangeError::EmptyRange);
    }
    Ok(((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY) as u32)
}

// Display-only formatting; never used in comparisons.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

// The search form defaults to a one-night stay starting today.
pub fn default_search_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test_case(utc(2024, 6, 1, 0), utc(2024, 6, 2, 0), 1; "one whole day")]
    #[test_case(utc(2024, 6, 1, 0), utc(2024, 6, 3, 0), 2; "two whole days")]
    #[test_case(utc(2024, 6, 1, 0), utc(2024, 6, 8, 0), 7; "one week")]
    #[test_case(utc(2024, 6, 1, 14), utc(2024, 6, 3, 14), 2; "aligned afternoon instants")]
    #[test_case(utc(2024, 6, 1, 0), utc(2024, 6, 3, 12), 3; "mid-day check-out rounds up")]
    #[test_case(utc(2024, 6, 1, 14), utc(2024, 6, 2, 10), 1; "short overnight stay")]
    fn nights_for_valid_spans(check_in: DateTime<Utc>, check_out: DateTime<Utc>, expected: u32) {
        assert_eq!(nights_between(check_in, check_out), Ok(expected));
    }

    #[test]
    fn zero_span_is_rejected() {
        let at = utc(2024, 6, 1, 0);
        assert_eq!(nights_between(at, at), Err(DateRangeError::EmptyRange));
    }

    #[test]
    fn inverted_span_is_rejected() {
        assert_eq!(
            nights_between(utc(2024, 6, 3, 0), utc(2024, 6, 1, 0)),
            Err(DateRangeError::EmptyRange)
        );
    }

    #[test]
    fn local_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_local_date(date), "01.06.2024");
    }

    #[test]
    fn default_range_is_one_night_from_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (check_in, check_out) = default_search_range(today);
        assert_eq!(check_in, today);
        assert_eq!(check_out, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }
}
