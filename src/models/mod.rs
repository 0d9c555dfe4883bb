//! Core data models for the HR ledger engine.
//!
//! This module contains all the domain records the ledgers own and persist.

mod attendance;
mod employee;
mod leave;
mod pay_period;
mod payroll;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use employee::{
    Allowances, Deductions, Employee, EmployeeStatus, LeaveBalance, Role, SalaryStructure,
};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use pay_period::{PayPeriod, parse_month};
pub use payroll::{PayrollRecord, PayrollStatus, PeriodSummary};
