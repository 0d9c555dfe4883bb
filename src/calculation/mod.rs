//! Calculation logic for the HR ledger engine.
//!
//! This module contains the pure derivation functions the ledgers run before
//! every write: time-of-day and day-count arithmetic, attendance hours and
//! status derivation, salary structure percentages, and payroll totals.

mod attendance_fields;
mod payroll_fields;
mod salary_structure;
mod time_math;

pub use attendance_fields::{derive_attendance_fields, derive_status};
pub use payroll_fields::derive_payroll_fields;
pub use salary_structure::{
    HOUSE_RENT_RATE, INCOME_TAX_RATE, MEDICAL_RATE, PROFESSIONAL_TAX, PROVIDENT_FUND_RATE,
    SPECIAL_RATE, TRANSPORT_RATE, recalculate_salary_structure,
};
pub use time_math::{format_time_of_day, hours_between, inclusive_day_count, parse_time_of_day};
