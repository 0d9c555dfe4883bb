//! Pay period model.
//!
//! A [`PayPeriod`] identifies one monthly payroll cycle as a (month, year)
//! pair. Periods order chronologically, so they can key uniqueness checks
//! and sort payroll listings.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Represents a monthly pay period.
///
/// Field order matters: the derived ordering compares `year` first.
///
/// # Example
///
/// ```
/// use hr_ledger::models::PayPeriod;
///
/// let june: PayPeriod = "June 2025".parse().unwrap();
/// let july: PayPeriod = "2025-07".parse().unwrap();
///
/// assert_eq!(june.month(), 6);
/// assert!(june < july);
/// assert_eq!(june.to_string(), "June 2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPayPeriod")]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

impl PayPeriod {
    /// Creates a pay period, validating that `month` is in `1..=12`.
    pub fn new(month: u32, year: i32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(
                "month",
                format!("{} is not a month number between 1 and 12", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// Returns the pay period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month number, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The English month name.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// First day of the period.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the period.
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// Checks if a date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following pay period.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Parses a month given as a number ("6", "06") or an English name, full or
/// abbreviated to at least three letters ("June", "jun").
pub fn parse_month(input: &str) -> LedgerResult<u32> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        if (1..=12).contains(&number) {
            return Ok(number);
        }
    } else if trimmed.len() >= 3 {
        let lower = trimmed.to_ascii_lowercase();
        if let Some(index) = MONTH_NAMES
            .iter()
            .position(|name| name.to_ascii_lowercase().starts_with(&lower))
        {
            return Ok(index as u32 + 1);
        }
    }
    Err(LedgerError::validation(
        "month",
        format!("'{}' is not a recognised month", input),
    ))
}

impl FromStr for PayPeriod {
    type Err = LedgerError;

    /// Accepts `"June 2025"`, `"6 2025"` or `"2025-06"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            let year = parse_year(year)?;
            return Self::new(parse_month(month)?, year);
        }
        match s.split_whitespace().collect::<Vec<_>>().as_slice() {
            [month, year] => Self::new(parse_month(month)?, parse_year(year)?),
            _ => Err(LedgerError::validation(
                "period",
                format!("'{}' is not a pay period (expected e.g. 'June 2025')", s),
            )),
        }
    }
}

fn parse_year(input: &str) -> LedgerResult<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| LedgerError::validation("year", format!("'{}' is not a year", input)))
}

/// Wire form accepted when deserializing a [`PayPeriod`].
#[derive(Deserialize)]
struct RawPayPeriod {
    month: RawMonth,
    year: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMonth {
    Number(u32),
    Name(String),
}

impl TryFrom<RawPayPeriod> for PayPeriod {
    type Error = LedgerError;

    fn try_from(raw: RawPayPeriod) -> Result<Self, Self::Error> {
        let month = match raw.month {
            RawMonth::Number(number) => number,
            RawMonth::Name(name) => parse_month(&name)?,
        };
        Self::new(month, raw.year)
    }
}
