//! Storage collaborator ports.
//!
//! The ledgers persist through these traits and never see the storage
//! technology. Adapters must enforce the uniqueness keys documented on each
//! insert and report violations as [`StoreError::UniqueViolation`], which
//! the ledgers map to domain errors. Conditional commits report a lost race
//! as [`StoreError::StaleWrite`].

mod memory;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, Employee, LeaveBalance, LeaveRequest, PayPeriod, PayrollRecord,
    SalaryStructure,
};

pub use memory::InMemoryStore;

/// Errors raised by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An insert collided with an existing unique key.
    #[error("unique constraint violated for {entity}: {key}")]
    UniqueViolation {
        /// The table or entity kind.
        entity: &'static str,
        /// The colliding key, rendered for diagnostics.
        key: String,
    },
    /// An update targeted a row that does not exist.
    #[error("{entity} {id} does not exist")]
    Missing {
        /// The table or entity kind.
        entity: &'static str,
        /// The identifier looked up.
        id: Uuid,
    },
    /// A conditional write found the row already moved on.
    #[error("{entity} {id} was modified concurrently")]
    StaleWrite {
        /// The table or entity kind.
        entity: &'static str,
        /// The identifier of the row.
        id: Uuid,
    },
    /// An approval would push a leave category below zero.
    #[error("leave request {id} would overdraw its category ({available} day(s) available)")]
    Overdraw {
        /// The leave request being approved.
        id: Uuid,
        /// Days left in the category at commit time.
        available: i64,
    },
    /// The backing store could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Adapter-specific detail.
        message: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Employee persistence.
pub trait EmployeeRepository: Send + Sync {
    /// Fetches an employee by id.
    fn find_employee(&self, id: Uuid) -> StoreResult<Option<Employee>>;

    /// All employees with status `active`, ordered by employee code.
    fn active_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Inserts or replaces an employee. `employee_code` is unique.
    fn save_employee(&self, employee: &Employee) -> StoreResult<()>;

    /// Replaces only the salary structure of an existing employee and
    /// returns the stored record. Fails with `Missing` if absent.
    ///
    /// Leaves every other field, the leave balance included, as stored.
    fn update_salary(&self, id: Uuid, salary: &SalaryStructure) -> StoreResult<Employee>;
}

/// Attendance persistence, unique on `(employee_id, date)`.
pub trait AttendanceRepository: Send + Sync {
    /// Fetches the record for an employee-day.
    fn find_attendance(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Inserts a new record; fails with `UniqueViolation` if the day exists.
    fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()>;

    /// Replaces an existing record; fails with `Missing` if absent.
    fn update_attendance(&self, record: &AttendanceRecord) -> StoreResult<()>;

    /// Records for `employee_id` with `from <= date <= to`, oldest first.
    fn attendance_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>>;
}

/// Leave request persistence.
pub trait LeaveRepository: Send + Sync {
    /// Inserts a new request.
    fn insert_leave(&self, request: &LeaveRequest) -> StoreResult<()>;

    /// Fetches a request by id.
    fn find_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>>;

    /// Requests made by an employee, newest first.
    fn leave_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<LeaveRequest>>;

    /// All pending requests, oldest first.
    fn pending_leave(&self) -> StoreResult<Vec<LeaveRequest>>;

    /// Replaces an existing request; fails with `Missing` if absent.
    fn update_leave(&self, request: &LeaveRequest) -> StoreResult<()>;

    /// Atomically writes a review outcome.
    ///
    /// An approved outcome also charges `request.days` against the owner's
    /// balance in the same commit and returns the new balance; a rejection
    /// returns `None`. Succeeds only while the stored request is still
    /// pending; otherwise fails with `StaleWrite` and writes nothing.
    ///
    /// With `reject_overdraw`, an approval whose category holds fewer than
    /// `request.days` at commit time fails with `Overdraw` and writes nothing.
    fn commit_review(
        &self,
        request: &LeaveRequest,
        reject_overdraw: bool,
    ) -> StoreResult<Option<LeaveBalance>>;

    /// Removes a request, returning what was stored.
    fn delete_leave(&self, id: Uuid) -> StoreResult<LeaveRequest>;
}

/// Payroll persistence, unique on `(employee_id, period)`.
pub trait PayrollRepository: Send + Sync {
    /// Inserts a new record; fails with `UniqueViolation` if the pair exists.
    fn insert_payroll(&self, record: &PayrollRecord) -> StoreResult<()>;

    /// Fetches a record by id.
    fn find_payroll(&self, id: Uuid) -> StoreResult<Option<PayrollRecord>>;

    /// Fetches the record for an employee and period.
    fn find_payroll_for(
        &self,
        employee_id: Uuid,
        period: PayPeriod,
    ) -> StoreResult<Option<PayrollRecord>>;

    /// Records in a period.
    fn payroll_for_period(&self, period: PayPeriod) -> StoreResult<Vec<PayrollRecord>>;

    /// Records for an employee, most recent period first.
    fn payroll_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<PayrollRecord>>;

    /// Writes a paid record; fails with `StaleWrite` unless the stored one is pending.
    fn commit_payment(&self, record: &PayrollRecord) -> StoreResult<()>;
}
