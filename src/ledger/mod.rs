//! The ledgers: stateful domain services over the storage ports.
//!
//! Each ledger owns one family of records, reads "now" from an injected
//! [`Clock`](crate::clock::Clock), and runs the pure derivations from
//! [`calculation`](crate::calculation) before every write.

mod attendance;
mod leave;
mod payroll;

use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Employee;
use crate::store::EmployeeRepository;

pub use attendance::{AttendanceEdit, AttendanceLedger, AttendanceSummary};
pub use leave::LeaveLedger;
pub use payroll::{BatchFailure, BatchOutcome, PayrollEngine};

fn require_employee(employees: &dyn EmployeeRepository, id: Uuid) -> LedgerResult<Employee> {
    employees
        .find_employee(id)?
        .ok_or(LedgerError::NotFound {
            entity: "employee",
            id,
        })
}
