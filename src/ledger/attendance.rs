//! Attendance ledger.
//!
//! Keeps one [`AttendanceRecord`] per employee per day and drives it
//! through `no-record -> checked-in -> checked-out`. Administrative edits
//! may write either state directly.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{derive_attendance_fields, format_time_of_day};
use crate::clock::Clock;
use crate::config::AttendancePolicy;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceRecord, AttendanceStatus, PayPeriod};
use crate::store::{AttendanceRepository, EmployeeRepository, StoreError};

use super::require_employee;

/// A direct administrative write to an employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEdit {
    /// The employee.
    pub employee_id: Uuid,
    /// The day being corrected.
    pub date: NaiveDate,
    /// Check-in to store (replaces any existing value).
    pub check_in: Option<NaiveTime>,
    /// Check-out to store (replaces any existing value).
    pub check_out: Option<NaiveTime>,
    /// Status to pin. `None` lets the status derive from hours.
    pub status: Option<AttendanceStatus>,
}

/// Attendance totals over a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The summarised period.
    pub period: PayPeriod,
    /// Days marked present.
    pub present_days: u32,
    /// Days marked half-day.
    pub half_days: u32,
    /// Days with a record marked absent.
    pub absent_days: u32,
    /// Days marked leave.
    pub leave_days: u32,
    /// Sum of recorded hours.
    pub total_hours: Decimal,
}

impl AttendanceSummary {
    fn from_records(period: PayPeriod, records: &[AttendanceRecord]) -> Self {
        let mut summary = Self {
            period,
            present_days: 0,
            half_days: 0,
            absent_days: 0,
            leave_days: 0,
            total_hours: Decimal::ZERO,
        };
        for record in records {
            match record.status {
                AttendanceStatus::Present => summary.present_days += 1,
                AttendanceStatus::HalfDay => summary.half_days += 1,
                AttendanceStatus::Absent => summary.absent_days += 1,
                AttendanceStatus::Leave => summary.leave_days += 1,
            }
            summary.total_hours += record.hours;
        }
        summary
    }
}

/// Owns attendance records and their derived fields.
pub struct AttendanceLedger {
    employees: Arc<dyn EmployeeRepository>,
    records: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
    policy: AttendancePolicy,
}

impl AttendanceLedger {
    /// Creates a ledger over the given collaborators.
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        records: Arc<dyn AttendanceRepository>,
        clock: Arc<dyn Clock>,
        policy: AttendancePolicy,
    ) -> Self {
        Self {
            employees,
            records,
            clock,
            policy,
        }
    }

    /// Records a check-in at `at` for today.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the employee does not exist
    /// - `AlreadyCheckedIn` if today's record already has a check-in, including
    ///   when a concurrent check-in wins the insert
    pub fn check_in(&self, employee_id: Uuid, at: NaiveTime) -> LedgerResult<AttendanceRecord> {
        require_employee(self.employees.as_ref(), employee_id)?;
        let date = self.clock.today();
        let already_checked_in = LedgerError::AlreadyCheckedIn { employee_id, date };

        match self.records.find_attendance(employee_id, date)? {
            Some(existing) if existing.check_in.is_some() => {
                warn!(employee_id = %employee_id, date = %date, "Duplicate check-in");
                Err(already_checked_in)
            }
            Some(mut existing) => {
                existing.check_in = Some(at);
                if !existing.status_override {
                    existing.status = AttendanceStatus::Present;
                }
                let record = derive_attendance_fields(existing, &self.policy)?;
                self.records.update_attendance(&record)?;
                info!(employee_id = %employee_id, date = %date, check_in = %format_time_of_day(at), "Checked in");
                Ok(record)
            }
            None => {
                let mut record = AttendanceRecord::new(employee_id, date);
                record.check_in = Some(at);
                record.status = AttendanceStatus::Present;
                let record = derive_attendance_fields(record, &self.policy)?;
                match self.records.insert_attendance(&record) {
                    Ok(()) => {
                        info!(employee_id = %employee_id, date = %date, check_in = %format_time_of_day(at), "Checked in");
                        Ok(record)
                    }
                    Err(StoreError::UniqueViolation { .. }) => {
                        warn!(employee_id = %employee_id, date = %date, "Concurrent check-in lost the insert");
                        Err(already_checked_in)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Records a check-out at `at` for today and derives hours and status.
    ///
    /// # Errors
    ///
    /// - `NoCheckInFound` if there is no record for today or it lacks a check-in
    /// - `AlreadyCheckedOut` if today's record already has a check-out
    /// - `ValidationFailed` for reversed times under the `reject` policy
    pub fn check_out(&self, employee_id: Uuid, at: NaiveTime) -> LedgerResult<AttendanceRecord> {
        let date = self.clock.today();
        let mut record = match self.records.find_attendance(employee_id, date)? {
            Some(record) if record.check_in.is_some() => record,
            _ => {
                warn!(employee_id = %employee_id, date = %date, "Check-out without check-in");
                return Err(LedgerError::NoCheckInFound { employee_id, date });
            }
        };
        if record.check_out.is_some() {
            warn!(employee_id = %employee_id, date = %date, "Duplicate check-out");
            return Err(LedgerError::AlreadyCheckedOut { employee_id, date });
        }

        record.check_out = Some(at);
        let record = derive_attendance_fields(record, &self.policy)?;
        self.records.update_attendance(&record)?;
        info!(
            employee_id = %employee_id,
            date = %date,
            hours = %record.hours,
            status = ?record.status,
            "Checked out"
        );
        Ok(record)
    }

    /// Looks up the record for an employee-day.
    pub fn record_for(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> LedgerResult<Option<AttendanceRecord>> {
        Ok(self.records.find_attendance(employee_id, date)?)
    }

    /// Creates or overwrites an employee-day outside the check-in flow.
    ///
    /// Times are written as given. A status in the edit pins it; otherwise
    /// the status is re-derived from the hours.
    pub fn admin_upsert(&self, edit: AttendanceEdit) -> LedgerResult<AttendanceRecord> {
        require_employee(self.employees.as_ref(), edit.employee_id)?;
        let existing = self.records.find_attendance(edit.employee_id, edit.date)?;
        let is_new = existing.is_none();
        let mut record =
            existing.unwrap_or_else(|| AttendanceRecord::new(edit.employee_id, edit.date));

        record.check_in = edit.check_in;
        record.check_out = edit.check_out;
        record.hours = Decimal::ZERO;
        match edit.status {
            Some(status) => {
                record.status = status;
                record.status_override = true;
            }
            None => {
                record.status_override = false;
                // A complete day is re-derived from hours; a short one stays absent.
                record.status = if record.check_in.is_some() && !record.is_complete() {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };
            }
        }

        let mut record = derive_attendance_fields(record, &self.policy)?;
        if !is_new {
            self.records.update_attendance(&record)?;
        } else if let Err(e) = self.records.insert_attendance(&record) {
            let StoreError::UniqueViolation { .. } = e else {
                return Err(e.into());
            };
            // A check-in created the day first; the edit overwrites it.
            let winner = self
                .records
                .find_attendance(record.employee_id, record.date)?
                .ok_or(LedgerError::NotFound {
                    entity: "attendance record",
                    id: record.id,
                })?;
            warn!(employee_id = %record.employee_id, date = %record.date, "Admin edit raced a check-in");
            record.id = winner.id;
            self.records.update_attendance(&record)?;
        }
        info!(
            employee_id = %record.employee_id,
            date = %record.date,
            status = ?record.status,
            pinned = record.status_override,
            "Attendance edited"
        );
        Ok(record)
    }

    /// Records for an employee between two dates (inclusive), oldest first.
    pub fn records_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Vec<AttendanceRecord>> {
        if from > to {
            return Err(LedgerError::InvalidDateRange {
                start: from,
                end: to,
            });
        }
        Ok(self.records.attendance_between(employee_id, from, to)?)
    }

    /// Counts statuses and sums hours over a pay period.
    ///
    /// Days without any record are not counted.
    pub fn monthly_summary(
        &self,
        employee_id: Uuid,
        period: PayPeriod,
    ) -> LedgerResult<AttendanceSummary> {
        let records = self.records_between(employee_id, period.first_day(), period.last_day())?;
        Ok(AttendanceSummary::from_records(period, &records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::parse_time_of_day;
    use crate::clock::FixedClock;
    use crate::config::ReversedTimes;
    use crate::models::{Employee, LeaveBalance, Role};
    use crate::store::{InMemoryStore, StoreResult};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        ledger: AttendanceLedger,
        clock: Arc<FixedClock>,
        employee_id: Uuid,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time_of_day(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn fixture_with(policy: AttendancePolicy) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let employee = Employee::hire(
            "EMP001",
            "Asha Rao",
            "asha@example.com",
            Role::Employee,
            Decimal::new(40000, 0),
            LeaveBalance::new(12, 10, 5),
        )
        .unwrap();
        store.save_employee(&employee).unwrap();
        let clock = Arc::new(FixedClock::on(today()));
        let ledger = AttendanceLedger::new(store.clone(), store, clock.clone(), policy);
        Fixture {
            ledger,
            clock,
            employee_id: employee.id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(AttendancePolicy::default())
    }

    #[test]
    fn test_check_in_creates_present_record() {
        let f = fixture();
        let record = f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        assert_eq!(record.date, today());
        assert_eq!(record.check_in, Some(time("09:00")));
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(
            f.ledger.record_for(f.employee_id, today()).unwrap(),
            Some(record)
        );
    }

    #[test]
    fn test_check_in_unknown_employee() {
        let f = fixture();
        let result = f.ledger.check_in(Uuid::new_v4(), time("09:00"));
        assert!(matches!(result, Err(LedgerError::NotFound { entity: "employee", .. })));
    }

    #[test]
    fn test_check_in_twice_fails() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        let result = f.ledger.check_in(f.employee_id, time("09:05"));
        assert!(matches!(result, Err(LedgerError::AlreadyCheckedIn { .. })));
    }

    #[test]
    fn test_check_in_again_next_day() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        f.clock.advance(chrono::Duration::days(1));
        let record = f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        assert_eq!(record.date, today().succ_opt().unwrap());
    }

    #[test]
    fn test_check_out_derives_hours_and_status() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        let record = f.ledger.check_out(f.employee_id, time("17:30")).unwrap();
        assert_eq!(record.hours, dec("8.5"));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_check_out_half_day() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        let record = f.ledger.check_out(f.employee_id, time("14:00")).unwrap();
        assert_eq!(record.hours, dec("5"));
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_check_out_short_day_keeps_prior_status() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        let record = f.ledger.check_out(f.employee_id, time("11:00")).unwrap();
        assert_eq!(record.hours, dec("2"));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_check_out_without_check_in() {
        let f = fixture();
        let result = f.ledger.check_out(f.employee_id, time("17:00"));
        assert!(matches!(result, Err(LedgerError::NoCheckInFound { .. })));
    }

    #[test]
    fn test_check_out_twice() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        f.ledger.check_out(f.employee_id, time("17:00")).unwrap();
        let result = f.ledger.check_out(f.employee_id, time("18:00"));
        assert!(matches!(result, Err(LedgerError::AlreadyCheckedOut { .. })));
    }

    #[test]
    fn test_reversed_check_out_rejected_in_strict_mode() {
        let f = fixture_with(AttendancePolicy {
            reversed_times: ReversedTimes::Reject,
            ..AttendancePolicy::default()
        });
        f.ledger.check_in(f.employee_id, time("17:00")).unwrap();
        let result = f.ledger.check_out(f.employee_id, time("09:00"));
        assert!(matches!(result, Err(LedgerError::ValidationFailed { .. })));
        let stored = f.ledger.record_for(f.employee_id, today()).unwrap().unwrap();
        assert!(stored.check_out.is_none());
    }

    #[test]
    fn test_check_in_fills_admin_created_record() {
        let f = fixture();
        f.ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: today(),
                check_in: None,
                check_out: None,
                status: None,
            })
            .unwrap();
        let record = f.ledger.check_in(f.employee_id, time("08:45")).unwrap();
        assert_eq!(record.check_in, Some(time("08:45")));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    /// Attendance storage whose next lookup misses, as if a concurrent
    /// check-in landed between the lookup and the insert.
    struct LateCheckIn {
        inner: Arc<InMemoryStore>,
        miss_next_find: AtomicBool,
    }

    impl AttendanceRepository for LateCheckIn {
        fn find_attendance(
            &self,
            employee_id: Uuid,
            date: NaiveDate,
        ) -> StoreResult<Option<AttendanceRecord>> {
            if self.miss_next_find.swap(false, Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_attendance(employee_id, date)
        }

        fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
            self.inner.insert_attendance(record)
        }

        fn update_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
            self.inner.update_attendance(record)
        }

        fn attendance_between(
            &self,
            employee_id: Uuid,
            from: NaiveDate,
            to: NaiveDate,
        ) -> StoreResult<Vec<AttendanceRecord>> {
            self.inner.attendance_between(employee_id, from, to)
        }
    }

    #[test]
    fn test_admin_upsert_overwrites_record_created_by_racing_check_in() {
        let f = fixture();
        let store = Arc::new(InMemoryStore::new());
        let employee = Employee::hire(
            "EMP002",
            "Ravi Menon",
            "ravi@example.com",
            Role::Employee,
            Decimal::new(40000, 0),
            LeaveBalance::new(12, 10, 5),
        )
        .unwrap();
        store.save_employee(&employee).unwrap();
        let racing = Arc::new(LateCheckIn {
            inner: store.clone(),
            miss_next_find: AtomicBool::new(false),
        });
        let ledger =
            AttendanceLedger::new(store.clone(), racing.clone(), f.clock.clone(), AttendancePolicy::default());

        let checked_in = ledger.check_in(employee.id, time("09:00")).unwrap();
        racing
            .miss_next_find
            .store(true, Ordering::SeqCst);

        let edited = ledger
            .admin_upsert(AttendanceEdit {
                employee_id: employee.id,
                date: today(),
                check_in: Some(time("08:30")),
                check_out: Some(time("17:00")),
                status: None,
            })
            .unwrap();
        assert_eq!(edited.id, checked_in.id);
        assert_eq!(edited.hours, dec("8.5"));
        assert_eq!(edited.status, AttendanceStatus::Present);

        let stored = store.find_attendance(employee.id, today()).unwrap().unwrap();
        assert_eq!(stored, edited);
    }

    #[test]
    fn test_admin_upsert_derives_status() {
        let f = fixture();
        let record = f
            .ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: today(),
                check_in: Some(time("10:00")),
                check_out: Some(time("15:00")),
                status: None,
            })
            .unwrap();
        assert_eq!(record.hours, dec("5"));
        assert_eq!(record.status, AttendanceStatus::HalfDay);
        assert!(!record.status_override);
    }

    #[test]
    fn test_admin_upsert_short_day_is_absent() {
        let f = fixture();
        let record = f
            .ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: today(),
                check_in: Some(time("10:00")),
                check_out: Some(time("11:00")),
                status: None,
            })
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_admin_upsert_pins_status() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        let record = f
            .ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: today(),
                check_in: Some(time("09:00")),
                check_out: Some(time("18:00")),
                status: Some(AttendanceStatus::Leave),
            })
            .unwrap();
        assert_eq!(record.hours, dec("9"));
        assert_eq!(record.status, AttendanceStatus::Leave);
        assert!(record.status_override);
    }

    #[test]
    fn test_records_between_rejects_reversed_range() {
        let f = fixture();
        let result = f.ledger.records_between(
            f.employee_id,
            today(),
            today().pred_opt().unwrap(),
        );
        assert!(matches!(result, Err(LedgerError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_monthly_summary() {
        let f = fixture();
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        f.ledger.check_out(f.employee_id, time("17:30")).unwrap();
        f.clock.advance(chrono::Duration::days(1));
        f.ledger.check_in(f.employee_id, time("09:00")).unwrap();
        f.ledger.check_out(f.employee_id, time("13:30")).unwrap();
        f.ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                check_in: None,
                check_out: None,
                status: Some(AttendanceStatus::Leave),
            })
            .unwrap();
        // Outside the period.
        f.ledger
            .admin_upsert(AttendanceEdit {
                employee_id: f.employee_id,
                date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                check_in: Some(time("09:00")),
                check_out: Some(time("17:00")),
                status: None,
            })
            .unwrap();

        let summary = f
            .ledger
            .monthly_summary(f.employee_id, PayPeriod::new(6, 2025).unwrap())
            .unwrap();
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(summary.absent_days, 0);
        assert_eq!(summary.total_hours, dec("13"));
    }
}
