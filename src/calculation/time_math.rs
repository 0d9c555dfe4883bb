//! Time-of-day and calendar arithmetic.
//!
//! Pure helpers converting `HH:MM` check-in/check-out pairs into worked
//! hours and date ranges into inclusive day counts.

use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, LedgerResult};

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Parses a 24-hour `HH:MM` time of day.
///
/// # Example
///
/// ```
/// use hr_ledger::calculation::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time_of_day("17:30").unwrap(), NaiveTime::from_hms_opt(17, 30, 0).unwrap());
/// assert!(parse_time_of_day("25:00").is_err());
/// ```
pub fn parse_time_of_day(input: &str) -> LedgerResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_OF_DAY_FORMAT).map_err(|e| {
        LedgerError::validation("time", format!("'{}' is not an HH:MM time: {}", input, e))
    })
}

/// Formats a time of day as `HH:MM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_OF_DAY_FORMAT).to_string()
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

/// Elapsed hours between two times of day, rounded to 2 decimal places.
///
/// Seconds are ignored. A check-out earlier than the check-in yields a
/// negative value; callers apply their reversed-times policy.
///
/// # Example
///
/// ```
/// use hr_ledger::calculation::{hours_between, parse_time_of_day};
/// use rust_decimal::Decimal;
///
/// let hours = hours_between(
///     parse_time_of_day("09:00").unwrap(),
///     parse_time_of_day("17:30").unwrap(),
/// );
/// assert_eq!(hours, Decimal::new(85, 1));
/// ```
pub fn hours_between(check_in: NaiveTime, check_out: NaiveTime) -> Decimal {
    let minutes = minutes_of_day(check_out) - minutes_of_day(check_in);
    (Decimal::new(minutes, 0) / Decimal::new(60, 0))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// # Errors
///
/// `InvalidDateRange` when `start` is after `end`.
///
/// # Example
///
/// ```
/// use hr_ledger::calculation::inclusive_day_count;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
/// assert_eq!(inclusive_day_count(start, end).unwrap(), 3);
/// ```
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> LedgerResult<i64> {
    if start > end {
        return Err(LedgerError::InvalidDateRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}
