//! In-memory storage adapter.
//!
//! All tables sit behind one mutex, so every trait call (including the
//! multi-table [`LeaveRepository::commit_review`]) is atomic.

use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, Employee, EmployeeStatus, LeaveBalance, LeaveRequest, LeaveStatus,
    PayPeriod, PayrollRecord, PayrollStatus, SalaryStructure,
};

use super::{
    AttendanceRepository, EmployeeRepository, LeaveRepository, PayrollRepository, StoreError,
    StoreResult,
};

#[derive(Debug, Default)]
struct Tables {
    employees: HashMap<Uuid, Employee>,
    attendance: HashMap<(Uuid, NaiveDate), AttendanceRecord>,
    leave: HashMap<Uuid, LeaveRequest>,
    payroll: HashMap<Uuid, PayrollRecord>,
    payroll_keys: HashMap<(Uuid, PayPeriod), Uuid>,
}

/// A process-local store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmployeeRepository for InMemoryStore {
    fn find_employee(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        Ok(self.tables.lock().employees.get(&id).cloned())
    }

    fn active_employees(&self) -> StoreResult<Vec<Employee>> {
        let tables = self.tables.lock();
        let mut active: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| e.status == EmployeeStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.employee_code.cmp(&b.employee_code));
        Ok(active)
    }

    fn save_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let code_taken = tables
            .employees
            .values()
            .any(|e| e.id != employee.id && e.employee_code == employee.employee_code);
        if code_taken {
            return Err(StoreError::UniqueViolation {
                entity: "employee",
                key: employee.employee_code.clone(),
            });
        }
        tables.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    fn update_salary(&self, id: Uuid, salary: &SalaryStructure) -> StoreResult<Employee> {
        let mut tables = self.tables.lock();
        let employee = tables.employees.get_mut(&id).ok_or(StoreError::Missing {
            entity: "employee",
            id,
        })?;
        employee.salary = salary.clone();
        Ok(employee.clone())
    }
}

impl AttendanceRepository for InMemoryStore {
    fn find_attendance(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .tables
            .lock()
            .attendance
            .get(&(employee_id, date))
            .cloned())
    }

    fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let key = (record.employee_id, record.date);
        if tables.attendance.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                entity: "attendance",
                key: format!("{}/{}", record.employee_id, record.date),
            });
        }
        tables.attendance.insert(key, record.clone());
        Ok(())
    }

    fn update_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        match tables.attendance.get_mut(&(record.employee_id, record.date)) {
            Some(stored) if stored.id == record.id => {
                *stored = record.clone();
                Ok(())
            }
            _ => Err(StoreError::Missing {
                entity: "attendance",
                id: record.id,
            }),
        }
    }

    fn attendance_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let tables = self.tables.lock();
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

impl LeaveRepository for InMemoryStore {
    fn insert_leave(&self, request: &LeaveRequest) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if tables.leave.contains_key(&request.id) {
            return Err(StoreError::UniqueViolation {
                entity: "leave request",
                key: request.id.to_string(),
            });
        }
        tables.leave.insert(request.id, request.clone());
        Ok(())
    }

    fn find_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.tables.lock().leave.get(&id).cloned())
    }

    fn leave_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.tables.lock();
        let mut requests: Vec<LeaveRequest> = tables
            .leave
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(requests)
    }

    fn pending_leave(&self) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.tables.lock();
        let mut requests: Vec<LeaveRequest> = tables
            .leave
            .values()
            .filter(|r| r.status == LeaveStatus::Pending)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.applied_date);
        Ok(requests)
    }

    fn update_leave(&self, request: &LeaveRequest) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        match tables.leave.get_mut(&request.id) {
            Some(stored) => {
                *stored = request.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                entity: "leave request",
                id: request.id,
            }),
        }
    }

    fn commit_review(
        &self,
        request: &LeaveRequest,
        reject_overdraw: bool,
    ) -> StoreResult<Option<LeaveBalance>> {
        let mut tables = self.tables.lock();
        let Tables {
            employees, leave, ..
        } = &mut *tables;

        let stored = leave.get_mut(&request.id).ok_or(StoreError::Missing {
            entity: "leave request",
            id: request.id,
        })?;
        if stored.status != LeaveStatus::Pending {
            return Err(StoreError::StaleWrite {
                entity: "leave request",
                id: request.id,
            });
        }

        let charged = if request.status == LeaveStatus::Approved {
            let employee = employees
                .get_mut(&request.employee_id)
                .ok_or(StoreError::Missing {
                    entity: "employee",
                    id: request.employee_id,
                })?;
            let available = employee.leave_balance.available(request.leave_type);
            if reject_overdraw && available < request.days {
                return Err(StoreError::Overdraw {
                    id: request.id,
                    available,
                });
            }
            employee
                .leave_balance
                .charge(request.leave_type, request.days);
            Some(employee.leave_balance)
        } else {
            None
        };
        *stored = request.clone();
        Ok(charged)
    }

    fn delete_leave(&self, id: Uuid) -> StoreResult<LeaveRequest> {
        self.tables
            .lock()
            .leave
            .remove(&id)
            .ok_or(StoreError::Missing {
                entity: "leave request",
                id,
            })
    }
}

impl PayrollRepository for InMemoryStore {
    fn insert_payroll(&self, record: &PayrollRecord) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let key = (record.employee_id, record.period);
        if tables.payroll_keys.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                entity: "payroll",
                key: format!("{}/{}", record.employee_id, record.period),
            });
        }
        tables.payroll_keys.insert(key, record.id);
        tables.payroll.insert(record.id, record.clone());
        Ok(())
    }

    fn find_payroll(&self, id: Uuid) -> StoreResult<Option<PayrollRecord>> {
        Ok(self.tables.lock().payroll.get(&id).cloned())
    }

    fn find_payroll_for(
        &self,
        employee_id: Uuid,
        period: PayPeriod,
    ) -> StoreResult<Option<PayrollRecord>> {
        let tables = self.tables.lock();
        Ok(tables
            .payroll_keys
            .get(&(employee_id, period))
            .and_then(|id| tables.payroll.get(id))
            .cloned())
    }

    fn payroll_for_period(&self, period: PayPeriod) -> StoreResult<Vec<PayrollRecord>> {
        let tables = self.tables.lock();
        let mut records: Vec<PayrollRecord> = tables
            .payroll
            .values()
            .filter(|r| r.period == period)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.generated_at);
        Ok(records)
    }

    fn payroll_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<PayrollRecord>> {
        let tables = self.tables.lock();
        let mut records: Vec<PayrollRecord> = tables
            .payroll
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(records)
    }

    fn commit_payment(&self, record: &PayrollRecord) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let stored = tables.payroll.get_mut(&record.id).ok_or(StoreError::Missing {
            entity: "payroll",
            id: record.id,
        })?;
        if stored.status != PayrollStatus::Pending {
            return Err(StoreError::StaleWrite {
                entity: "payroll",
                id: record.id,
            });
        }
        *stored = record.clone();
        Ok(())
    }
}
