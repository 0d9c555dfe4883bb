//! Employee model and related types.
//!
//! This module defines the [`Employee`] record together with its salary
//! structure and leave balance counters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::recalculate_salary_structure;
use crate::error::{LedgerError, LedgerResult};

use super::LeaveType;

/// The access role of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee.
    Employee,
    /// HR staff, may review leave.
    Hr,
    /// Administrator.
    Admin,
}

impl Role {
    /// Returns true for roles allowed to review and manage other employees' records.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed.
    Active,
    /// Terminated or soft-deactivated.
    Inactive,
    /// Temporarily suspended.
    Suspended,
}

/// Monthly allowance amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// House rent allowance.
    pub house_rent: Decimal,
    /// Medical allowance.
    pub medical: Decimal,
    /// Transport allowance.
    pub transport: Decimal,
    /// Special allowance.
    pub special: Decimal,
}

impl Allowances {
    /// Sum of all allowance categories.
    pub fn total(&self) -> Decimal {
        self.house_rent + self.medical + self.transport + self.special
    }

    fn all_non_negative(&self) -> bool {
        [self.house_rent, self.medical, self.transport, self.special]
            .iter()
            .all(|amount| !amount.is_sign_negative())
    }
}

/// Monthly deduction amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Provident fund contribution.
    pub provident_fund: Decimal,
    /// Income tax withholding.
    pub income_tax: Decimal,
    /// Flat professional tax.
    pub professional_tax: Decimal,
}

impl Deductions {
    /// Sum of all deduction categories.
    pub fn total(&self) -> Decimal {
        self.provident_fund + self.income_tax + self.professional_tax
    }

    fn all_non_negative(&self) -> bool {
        [self.provident_fund, self.income_tax, self.professional_tax]
            .iter()
            .all(|amount| !amount.is_sign_negative())
    }
}

/// The salary structure an employee is paid from.
///
/// Allowances and deductions follow from `base_salary` unless `overridden`
/// is set by an explicit administrative write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Allowance categories.
    pub allowances: Allowances,
    /// Deduction categories.
    pub deductions: Deductions,
    /// Set when allowances or deductions were written directly.
    #[serde(default)]
    pub overridden: bool,
}

/// Per-category leave entitlement counters.
///
/// `remaining` always equals `total() - used`; [`LeaveBalance::charge`] is the
/// only mutation and keeps the two in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Paid leave days left.
    pub paid: i64,
    /// Sick leave days left.
    pub sick: i64,
    /// Unpaid leave days left.
    pub unpaid: i64,
    /// Cumulative approved days.
    pub used: i64,
    /// Entitlement remaining across all categories.
    pub remaining: i64,
}

impl LeaveBalance {
    /// Creates a fresh balance with nothing used.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_ledger::models::LeaveBalance;
    ///
    /// let balance = LeaveBalance::new(12, 10, 5);
    /// assert_eq!(balance.remaining, 27);
    /// assert_eq!(balance.total(), 27);
    /// ```
    pub fn new(paid: i64, sick: i64, unpaid: i64) -> Self {
        Self {
            paid,
            sick,
            unpaid,
            used: 0,
            remaining: paid + sick + unpaid,
        }
    }

    /// Total entitlement (`used + remaining`).
    pub fn total(&self) -> i64 {
        self.used + self.remaining
    }

    /// Days left in one category.
    pub fn available(&self, leave_type: LeaveType) -> i64 {
        match leave_type {
            LeaveType::Paid => self.paid,
            LeaveType::Sick => self.sick,
            LeaveType::Unpaid => self.unpaid,
        }
    }

    /// Charges `days` against a category, moving them from `remaining` to `used`.
    ///
    /// No floor is applied; callers decide whether overdraw is allowed.
    pub fn charge(&mut self, leave_type: LeaveType, days: i64) {
        match leave_type {
            LeaveType::Paid => self.paid -= days,
            LeaveType::Sick => self.sick -= days,
            LeaveType::Unpaid => self.unpaid -= days,
        }
        self.used += days;
        self.remaining -= days;
    }

    /// Returns true when any counter is negative.
    pub fn is_overdrawn(&self) -> bool {
        self.paid < 0 || self.sick < 0 || self.unpaid < 0 || self.remaining < 0
    }
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique employee code (e.g. "EMP001").
    pub employee_code: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Salary structure.
    pub salary: SalaryStructure,
    /// Leave balance counters.
    pub leave_balance: LeaveBalance,
}

impl Employee {
    /// Creates an active employee, deriving the salary structure from `base_salary`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for an empty code or name, an email without
    /// `@`, or a negative base salary.
    pub fn hire(
        employee_code: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        base_salary: Decimal,
        leave_balance: LeaveBalance,
    ) -> LedgerResult<Self> {
        let employee_code = employee_code.into();
        let name = name.into();
        let email = email.into();

        if employee_code.trim().is_empty() {
            return Err(LedgerError::validation("employee_code", "must not be empty"));
        }
        if name.trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        if !email.contains('@') {
            return Err(LedgerError::validation(
                "email",
                format!("'{}' is not an email address", email),
            ));
        }

        let mut employee = Self {
            id: Uuid::new_v4(),
            employee_code,
            name,
            email,
            role,
            status: EmployeeStatus::Active,
            salary: SalaryStructure::default(),
            leave_balance,
        };
        employee.set_base_salary(base_salary)?;
        Ok(employee)
    }

    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Sets a new base salary and recalculates every allowance and deduction.
    ///
    /// Clears any previous override.
    pub fn set_base_salary(&mut self, base_salary: Decimal) -> LedgerResult<()> {
        if base_salary.is_sign_negative() {
            return Err(LedgerError::validation(
                "base_salary",
                "must not be negative",
            ));
        }
        self.salary = recalculate_salary_structure(base_salary);
        Ok(())
    }

    /// Writes allowances and deductions directly, marking the structure overridden.
    pub fn override_salary_components(
        &mut self,
        allowances: Allowances,
        deductions: Deductions,
    ) -> LedgerResult<()> {
        if !allowances.all_non_negative() {
            return Err(LedgerError::validation("allowances", "must not be negative"));
        }
        if !deductions.all_non_negative() {
            return Err(LedgerError::validation("deductions", "must not be negative"));
        }
        self.salary.allowances = allowances;
        self.salary.deductions = deductions;
        self.salary.overridden = true;
        Ok(())
    }

    /// Soft-deactivates the employee on termination.
    pub fn deactivate(&mut self) {
        self.status = EmployeeStatus::Inactive;
    }
}
