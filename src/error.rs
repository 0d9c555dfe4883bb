//! Error types for the HR ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every precondition and validation failure the ledgers can report.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{LeaveType, PayPeriod};
use crate::store::StoreError;

/// The main error type for the HR ledger engine.
///
/// All ledger operations return this error type. Every variant is scoped to
/// a single operation; none of them is fatal to the process.
///
/// # Example
///
/// ```
/// use hr_ledger::error::LedgerError;
///
/// let error = LedgerError::ConfigNotFound {
///     path: "/missing/ledger.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/ledger.yaml");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The employee already checked in on this day.
    #[error("Employee {employee_id} already checked in on {date}")]
    AlreadyCheckedIn {
        /// The employee.
        employee_id: Uuid,
        /// The attendance day.
        date: NaiveDate,
    },

    /// The employee already checked out on this day.
    #[error("Employee {employee_id} already checked out on {date}")]
    AlreadyCheckedOut {
        /// The employee.
        employee_id: Uuid,
        /// The attendance day.
        date: NaiveDate,
    },

    /// Check-out was attempted without a check-in for the day.
    #[error("No check-in found for employee {employee_id} on {date}")]
    NoCheckInFound {
        /// The employee.
        employee_id: Uuid,
        /// The attendance day.
        date: NaiveDate,
    },

    /// The leave balance for the category cannot cover the request.
    #[error("Insufficient {leave_type} leave balance: {available} day(s) available, {requested} requested")]
    InsufficientBalance {
        /// The leave category.
        leave_type: LeaveType,
        /// Days remaining in the category.
        available: i64,
        /// Days requested.
        requested: i64,
    },

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "employee", "leave request").
        entity: &'static str,
        /// The identifier that was looked up.
        id: Uuid,
    },

    /// The request or record already reached its terminal state.
    #[error("{entity} {id} has already been processed")]
    AlreadyProcessed {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier of the entity.
        id: Uuid,
    },

    /// A payroll record already exists for the employee and period.
    #[error("Payroll record already exists for employee {employee_id} in {period}")]
    DuplicateRecord {
        /// The employee.
        employee_id: Uuid,
        /// The pay period.
        period: PayPeriod,
    },

    /// The start date falls after the end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// A required field was missing or malformed.
    #[error("Invalid field '{field}': {message}")]
    ValidationFailed {
        /// The field that failed validation.
        field: String,
        /// A description of the failure.
        message: String,
    },

    /// The requester may not perform the operation.
    #[error("Employee {requester_id} is not permitted to {action}")]
    NotPermitted {
        /// The employee attempting the operation.
        requester_id: Uuid,
        /// A short description of the attempted operation.
        action: &'static str,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The storage collaborator failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    /// Builds a [`LedgerError::ValidationFailed`] for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = LedgerError::ConfigNotFound {
            path: "/missing/ledger.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/ledger.yaml"
        );
    }

    #[test]
    fn test_already_checked_in_displays_employee_and_date() {
        let employee_id = Uuid::nil();
        let error = LedgerError::AlreadyCheckedIn {
            employee_id,
            date: date(2025, 6, 10),
        };
        assert_eq!(
            error.to_string(),
            format!("Employee {} already checked in on 2025-06-10", employee_id)
        );
    }

    #[test]
    fn test_insufficient_balance_displays_category() {
        let error = LedgerError::InsufficientBalance {
            leave_type: LeaveType::Sick,
            available: 0,
            requested: 3,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient sick leave balance: 0 day(s) available, 3 requested"
        );
    }

    #[test]
    fn test_duplicate_record_displays_period() {
        let error = LedgerError::DuplicateRecord {
            employee_id: Uuid::nil(),
            period: PayPeriod::new(6, 2025).unwrap(),
        };
        assert!(error.to_string().ends_with("in June 2025"));
    }

    #[test]
    fn test_invalid_date_range_displays_dates() {
        let error = LedgerError::InvalidDateRange {
            start: date(2025, 6, 12),
            end: date(2025, 6, 10),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: 2025-06-12 is after 2025-06-10"
        );
    }

    #[test]
    fn test_validation_helper_builds_variant() {
        let error = LedgerError::validation("reason", "must not be empty");
        assert_eq!(error.to_string(), "Invalid field 'reason': must not be empty");
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let error: LedgerError = StoreError::Unavailable {
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "storage unavailable: connection refused");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<LedgerError>();
    }
}
