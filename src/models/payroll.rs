//! Payroll record models.
//!
//! A [`PayrollRecord`] snapshots an employee's salary structure for one
//! [`PayPeriod`]. Totals are derived by
//! [`derive_payroll_fields`](crate::calculation::derive_payroll_fields) before
//! every write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::derive_payroll_fields;

use super::{Allowances, Deductions, PayPeriod, SalaryStructure};

/// Payment state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Generated, not yet paid.
    Pending,
    /// Paid out. Terminal.
    #[serde(alias = "processed")]
    Paid,
}

/// A payroll record for one employee and one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: Uuid,
    /// The pay period.
    pub period: PayPeriod,
    /// Base salary at generation time.
    pub base_salary: Decimal,
    /// Allowance categories.
    pub allowances: Allowances,
    /// Sum of allowances.
    pub total_allowances: Decimal,
    /// Base salary plus allowances.
    pub gross_salary: Decimal,
    /// Deduction categories.
    pub deductions: Deductions,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Gross salary minus deductions.
    pub net_salary: Decimal,
    /// Payment state.
    pub status: PayrollStatus,
    /// When the record was paid.
    pub pay_date: Option<DateTime<Utc>>,
    /// When the record was generated.
    pub generated_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// Builds a pending record from a salary structure with all totals derived.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use hr_ledger::models::{Allowances, Deductions, PayPeriod, PayrollRecord, SalaryStructure};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let salary = SalaryStructure {
    ///     base_salary: Decimal::new(75000, 0),
    ///     allowances: Allowances { house_rent: Decimal::new(5000, 0), ..Allowances::default() },
    ///     deductions: Deductions { income_tax: Decimal::new(2000, 0), ..Deductions::default() },
    ///     overridden: true,
    /// };
    /// let record = PayrollRecord::from_salary(
    ///     Uuid::new_v4(),
    ///     PayPeriod::new(6, 2025).unwrap(),
    ///     &salary,
    ///     Utc::now(),
    /// );
    /// assert_eq!(record.net_salary, Decimal::new(78000, 0));
    /// ```
    pub fn from_salary(
        employee_id: Uuid,
        period: PayPeriod,
        salary: &SalaryStructure,
        generated_at: DateTime<Utc>,
    ) -> Self {
        derive_payroll_fields(Self {
            id: Uuid::new_v4(),
            employee_id,
            period,
            base_salary: salary.base_salary,
            allowances: salary.allowances.clone(),
            total_allowances: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            deductions: salary.deductions.clone(),
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            status: PayrollStatus::Pending,
            pay_date: None,
            generated_at,
        })
    }

    /// Returns true once the record has been paid.
    pub fn is_paid(&self) -> bool {
        self.status == PayrollStatus::Paid
    }
}

/// Aggregate figures for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Number of records in the period.
    pub record_count: usize,
    /// Number of records already paid.
    pub paid_count: usize,
    /// Sum of gross salaries.
    pub total_gross: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of net salaries.
    pub total_net: Decimal,
}

impl PeriodSummary {
    /// Folds a set of records into a summary.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PayrollRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                summary.record_count += 1;
                if record.is_paid() {
                    summary.paid_count += 1;
                }
                summary.total_gross += record.gross_salary;
                summary.total_deductions += record.total_deductions;
                summary.total_net += record.net_salary;
                summary
            })
    }
}
