//! Payroll engine.
//!
//! Generates one [`PayrollRecord`] per employee per [`PayPeriod`] from the
//! employee's current salary structure, and moves records `pending -> paid`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, PayPeriod, PayrollRecord, PayrollStatus, PeriodSummary};
use crate::notify::{Notification, NotificationKind, Notifier, dispatch};
use crate::store::{EmployeeRepository, PayrollRepository, StoreError};

use super::require_employee;

/// An employee whose record could not be generated in a batch run.
#[derive(Debug)]
pub struct BatchFailure {
    /// The employee skipped because of the error.
    pub employee_id: Uuid,
    /// What went wrong.
    pub error: LedgerError,
}

/// Result of [`PayrollEngine::generate_for_all`].
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records created by this run.
    pub created: Vec<PayrollRecord>,
    /// Employees that already had a record for the period.
    pub skipped: Vec<Uuid>,
    /// Employees whose generation failed for any other reason.
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Returns true if every active employee was either created or skipped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns payroll records.
pub struct PayrollEngine {
    employees: Arc<dyn EmployeeRepository>,
    payroll: Arc<dyn PayrollRepository>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl PayrollEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        payroll: Arc<dyn PayrollRepository>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            employees,
            payroll,
            clock,
            notifier,
        }
    }

    /// Generates a pending record for one employee and period.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the employee does not exist
    /// - `DuplicateRecord` if the employee already has a record for `period`
    pub fn generate(&self, employee_id: Uuid, period: PayPeriod) -> LedgerResult<PayrollRecord> {
        let employee = require_employee(self.employees.as_ref(), employee_id)?;
        self.generate_for(&employee, period)
    }

    /// Generates records for every active employee.
    ///
    /// Employees that already have a record for `period` are skipped. Any
    /// other per-employee failure is collected and the run continues.
    ///
    /// # Errors
    ///
    /// Fails only if the list of active employees cannot be read.
    pub fn generate_for_all(&self, period: PayPeriod) -> LedgerResult<BatchOutcome> {
        let employees = self.employees.active_employees()?;
        let mut outcome = BatchOutcome::default();

        for employee in &employees {
            match self.generate_for(employee, period) {
                Ok(record) => outcome.created.push(record),
                Err(LedgerError::DuplicateRecord { .. }) => outcome.skipped.push(employee.id),
                Err(error) => {
                    warn!(employee_id = %employee.id, period = %period, error = %error, "Payroll generation failed");
                    outcome.failures.push(BatchFailure {
                        employee_id: employee.id,
                        error,
                    });
                }
            }
        }

        info!(
            period = %period,
            created = outcome.created.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failures.len(),
            "Payroll batch finished"
        );
        Ok(outcome)
    }

    /// Marks a pending record paid, stamping the pay date, and notifies the employee.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record does not exist
    /// - `AlreadyProcessed` if the record is already paid, including when a
    ///   concurrent call commits first
    pub fn process(&self, record_id: Uuid) -> LedgerResult<PayrollRecord> {
        let mut record = self
            .payroll
            .find_payroll(record_id)?
            .ok_or(LedgerError::NotFound {
                entity: "payroll record",
                id: record_id,
            })?;
        if record.is_paid() {
            return Err(LedgerError::AlreadyProcessed {
                entity: "payroll record",
                id: record_id,
            });
        }

        record.status = PayrollStatus::Paid;
        record.pay_date = Some(self.clock.now());
        self.payroll.commit_payment(&record).map_err(|e| match e {
            StoreError::StaleWrite { .. } => LedgerError::AlreadyProcessed {
                entity: "payroll record",
                id: record_id,
            },
            StoreError::Missing { entity, id } => LedgerError::NotFound { entity, id },
            other => other.into(),
        })?;
        info!(record_id = %record_id, employee_id = %record.employee_id, net = %record.net_salary, "Payroll processed");

        dispatch(
            self.notifier.as_ref(),
            Notification {
                user_id: record.employee_id,
                kind: NotificationKind::PayrollProcessed,
                title: "Salary Processed".to_string(),
                message: format!(
                    "Your salary for {} has been processed. Net amount: {}",
                    record.period, record.net_salary
                ),
                link: "/payroll".to_string(),
            },
        );
        Ok(record)
    }

    /// Sets a new base salary and recalculates the employee's salary structure.
    ///
    /// Only the salary structure is written, so a leave approval committing
    /// meanwhile keeps its balance charge. Existing payroll records keep the
    /// figures they were generated with.
    pub fn update_base_salary(&self, employee_id: Uuid, base_salary: Decimal) -> LedgerResult<Employee> {
        let mut employee = require_employee(self.employees.as_ref(), employee_id)?;
        employee.set_base_salary(base_salary)?;
        let employee = self
            .employees
            .update_salary(employee_id, &employee.salary)
            .map_err(|e| match e {
                StoreError::Missing { entity, id } => LedgerError::NotFound { entity, id },
                other => other.into(),
            })?;
        info!(employee_id = %employee_id, base_salary = %base_salary, "Salary structure recalculated");
        Ok(employee)
    }

    /// Looks up a record.
    pub fn record(&self, record_id: Uuid) -> LedgerResult<Option<PayrollRecord>> {
        Ok(self.payroll.find_payroll(record_id)?)
    }

    /// Records in a period.
    pub fn records_for_period(&self, period: PayPeriod) -> LedgerResult<Vec<PayrollRecord>> {
        Ok(self.payroll.payroll_for_period(period)?)
    }

    /// An employee's records, most recent period first.
    pub fn records_for_employee(&self, employee_id: Uuid) -> LedgerResult<Vec<PayrollRecord>> {
        Ok(self.payroll.payroll_for_employee(employee_id)?)
    }

    /// Totals across a period.
    pub fn period_summary(&self, period: PayPeriod) -> LedgerResult<PeriodSummary> {
        let records = self.payroll.payroll_for_period(period)?;
        Ok(PeriodSummary::from_records(&records))
    }

    fn generate_for(&self, employee: &Employee, period: PayPeriod) -> LedgerResult<PayrollRecord> {
        let duplicate = || LedgerError::DuplicateRecord {
            employee_id: employee.id,
            period,
        };
        if self.payroll.find_payroll_for(employee.id, period)?.is_some() {
            debug!(employee_id = %employee.id, period = %period, "Payroll already generated");
            return Err(duplicate());
        }

        let record = PayrollRecord::from_salary(employee.id, period, &employee.salary, self.clock.now());
        self.payroll.insert_payroll(&record).map_err(|e| match e {
            StoreError::UniqueViolation { .. } => duplicate(),
            other => other.into(),
        })?;
        info!(
            record_id = %record.id,
            employee_id = %employee.id,
            period = %period,
            gross = %record.gross_salary,
            net = %record.net_salary,
            "Payroll generated"
        );
        Ok(record)
    }
}
