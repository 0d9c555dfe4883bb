//! Leave ledger.
//!
//! Requests move `pending -> approved | rejected` exactly once. Approval
//! charges the owner's [`LeaveBalance`](crate::models::LeaveBalance) in the
//! same storage commit as the status change.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{BalanceCheck, LeavePolicy, Overdraw};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
use crate::notify::{Notification, NotificationKind, Notifier, dispatch};
use crate::store::{EmployeeRepository, LeaveRepository, StoreError};

use super::require_employee;

/// Owns leave requests and the balance accounting tied to them.
pub struct LeaveLedger {
    employees: Arc<dyn EmployeeRepository>,
    requests: Arc<dyn LeaveRepository>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    policy: LeavePolicy,
}

impl LeaveLedger {
    /// Creates a ledger over the given collaborators.
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        requests: Arc<dyn LeaveRepository>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        policy: LeavePolicy,
    ) -> Self {
        Self {
            employees,
            requests,
            clock,
            notifier,
            policy,
        }
    }

    /// Files a pending leave request.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the employee does not exist
    /// - `InvalidDateRange` if `start_date` is after `end_date`
    /// - `ValidationFailed` if the reason is shorter than the configured minimum
    /// - `InsufficientBalance` if the category fails the configured balance check
    pub fn apply(
        &self,
        employee_id: Uuid,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> LedgerResult<LeaveRequest> {
        let employee = require_employee(self.employees.as_ref(), employee_id)?;

        let reason = reason.trim();
        let request = LeaveRequest::new(
            employee_id,
            leave_type,
            start_date,
            end_date,
            reason,
            self.clock.now(),
        )?;
        if reason.chars().count() < self.policy.min_reason_length {
            return Err(LedgerError::validation(
                "reason",
                format!(
                    "must be at least {} characters",
                    self.policy.min_reason_length
                ),
            ));
        }

        let available = employee.leave_balance.available(leave_type);
        let sufficient = match self.policy.balance_check {
            BalanceCheck::Positive => available > 0,
            BalanceCheck::CoversDays => available >= request.days,
        };
        if !sufficient {
            warn!(
                employee_id = %employee_id,
                leave_type = %leave_type,
                available,
                requested = request.days,
                "Leave application refused"
            );
            return Err(LedgerError::InsufficientBalance {
                leave_type,
                available,
                requested: request.days,
            });
        }

        self.requests.insert_leave(&request)?;
        info!(
            request_id = %request.id,
            employee_id = %employee_id,
            leave_type = %leave_type,
            days = request.days,
            "Leave applied"
        );
        Ok(request)
    }

    /// Approves a pending request and charges the employee's balance.
    ///
    /// The status change and the balance charge are committed together. The
    /// employee is notified afterwards; delivery failures are only logged.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request or its employee does not exist
    /// - `AlreadyProcessed` if the request is not pending, including when a
    ///   concurrent review commits first
    /// - `InsufficientBalance` if overdraw is rejected and the category cannot
    ///   cover the request when the approval commits
    pub fn approve(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        comments: Option<String>,
    ) -> LedgerResult<LeaveRequest> {
        let mut request = self.pending_request(request_id)?;
        let employee = require_employee(self.employees.as_ref(), request.employee_id)?;

        request.mark_reviewed(LeaveStatus::Approved, reviewer_id, self.clock.now(), comments);
        let reject_overdraw = self.policy.overdraw == Overdraw::Reject;
        let balance = self
            .commit(&request, reject_overdraw)?
            .ok_or(LedgerError::NotFound {
                entity: "employee",
                id: employee.id,
            })?;
        if balance.is_overdrawn() {
            warn!(employee_id = %request.employee_id, balance = ?balance, "Leave balance overdrawn");
        }
        info!(
            request_id = %request_id,
            reviewer_id = %reviewer_id,
            days = request.days,
            remaining = balance.remaining,
            "Leave approved"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification {
                user_id: request.employee_id,
                kind: NotificationKind::LeaveApproved,
                title: "Leave Approved".to_string(),
                message: format!(
                    "Your {} leave from {} to {} ({} day(s)) has been approved",
                    request.leave_type, request.start_date, request.end_date, request.days
                ),
                link: "/leave".to_string(),
            },
        );
        Ok(request)
    }

    /// Rejects a pending request. Balances are untouched.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist
    /// - `AlreadyProcessed` if the request is not pending
    pub fn reject(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        comments: Option<String>,
    ) -> LedgerResult<LeaveRequest> {
        let mut request = self.pending_request(request_id)?;
        request.mark_reviewed(LeaveStatus::Rejected, reviewer_id, self.clock.now(), comments);
        self.commit(&request, false)?;
        info!(request_id = %request_id, reviewer_id = %reviewer_id, "Leave rejected");

        dispatch(
            self.notifier.as_ref(),
            Notification {
                user_id: request.employee_id,
                kind: NotificationKind::LeaveRejected,
                title: "Leave Rejected".to_string(),
                message: format!(
                    "Your {} leave from {} to {} has been rejected",
                    request.leave_type, request.start_date, request.end_date
                ),
                link: "/leave".to_string(),
            },
        );
        Ok(request)
    }

    /// Deletes a request in any state.
    ///
    /// Allowed for the owner or an HR/admin requester. An approved request is
    /// removed without restoring the balance it charged.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request or the requester does not exist
    /// - `NotPermitted` if the requester is neither the owner nor a reviewer
    pub fn delete(&self, request_id: Uuid, requester_id: Uuid) -> LedgerResult<LeaveRequest> {
        let request = self.find(request_id)?;
        if request.employee_id != requester_id {
            let requester = require_employee(self.employees.as_ref(), requester_id)?;
            if !requester.role.is_reviewer() {
                warn!(request_id = %request_id, requester_id = %requester_id, "Leave deletion refused");
                return Err(LedgerError::NotPermitted {
                    requester_id,
                    action: "delete another employee's leave request",
                });
            }
        }

        let removed = self.requests.delete_leave(request_id).map_err(|e| match e {
            StoreError::Missing { .. } => LedgerError::NotFound {
                entity: "leave request",
                id: request_id,
            },
            other => other.into(),
        })?;
        if removed.status == LeaveStatus::Approved {
            warn!(
                request_id = %request_id,
                employee_id = %removed.employee_id,
                days = removed.days,
                "Approved leave deleted; balance not restored"
            );
        } else {
            info!(request_id = %request_id, requester_id = %requester_id, "Leave deleted");
        }
        Ok(removed)
    }

    /// Replaces the comments on a request. Allowed in any state.
    pub fn add_comment(&self, request_id: Uuid, comment: &str) -> LedgerResult<LeaveRequest> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(LedgerError::validation("comments", "must not be empty"));
        }
        let mut request = self.find(request_id)?;
        request.comments = Some(comment.to_string());
        self.requests.update_leave(&request)?;
        Ok(request)
    }

    /// Looks up a request.
    pub fn request(&self, request_id: Uuid) -> LedgerResult<Option<LeaveRequest>> {
        Ok(self.requests.find_leave(request_id)?)
    }

    /// An employee's requests, newest first.
    pub fn requests_for(&self, employee_id: Uuid) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(self.requests.leave_for_employee(employee_id)?)
    }

    /// Every request awaiting review, oldest first.
    pub fn pending_requests(&self) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(self.requests.pending_leave()?)
    }

    fn find(&self, request_id: Uuid) -> LedgerResult<LeaveRequest> {
        self.requests
            .find_leave(request_id)?
            .ok_or(LedgerError::NotFound {
                entity: "leave request",
                id: request_id,
            })
    }

    fn pending_request(&self, request_id: Uuid) -> LedgerResult<LeaveRequest> {
        let request = self.find(request_id)?;
        if !request.is_pending() {
            warn!(request_id = %request_id, status = ?request.status, "Leave already reviewed");
            return Err(LedgerError::AlreadyProcessed {
                entity: "leave request",
                id: request_id,
            });
        }
        Ok(request)
    }

    fn commit(
        &self,
        request: &LeaveRequest,
        reject_overdraw: bool,
    ) -> LedgerResult<Option<LeaveBalance>> {
        self.requests
            .commit_review(request, reject_overdraw)
            .map_err(|e| match e {
                StoreError::Overdraw { available, .. } => {
                    warn!(
                        request_id = %request.id,
                        available,
                        requested = request.days,
                        "Approval would overdraw balance"
                    );
                    LedgerError::InsufficientBalance {
                        leave_type: request.leave_type,
                        available,
                        requested: request.days,
                    }
                }
                StoreError::StaleWrite { .. } => LedgerError::AlreadyProcessed {
                    entity: "leave request",
                    id: request.id,
                },
                StoreError::Missing { entity, id } => LedgerError::NotFound { entity, id },
                other => other.into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Employee, Role};
    use crate::notify::RecordingNotifier;
    use crate::store::InMemoryStore;
    use rust_decimal::Decimal;

    struct Fixture {
        ledger: LeaveLedger,
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
        employee: Employee,
        hr: Employee,
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn hire(code: &str, role: Role, balance: LeaveBalance) -> Employee {
        Employee::hire(
            code,
            "Someone",
            format!("{}@example.com", code.to_lowercase()),
            role,
            Decimal::new(40000, 0),
            balance,
        )
        .unwrap()
    }

    fn fixture_with(policy: LeavePolicy, balance: LeaveBalance) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let employee = hire("EMP001", Role::Employee, balance);
        let hr = hire("HR001", Role::Hr, LeaveBalance::new(12, 10, 5));
        store.save_employee(&employee).unwrap();
        store.save_employee(&hr).unwrap();
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(FixedClock::on(date(1)));
        let ledger = LeaveLedger::new(store.clone(), store.clone(), clock, notifier.clone(), policy);
        Fixture {
            ledger,
            store,
            notifier,
            employee,
            hr,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(LeavePolicy::default(), LeaveBalance::new(12, 10, 5))
    }

    fn balance_of(f: &Fixture) -> LeaveBalance {
        f.store
            .find_employee(f.employee.id)
            .unwrap()
            .unwrap()
            .leave_balance
    }

    fn apply_three_days(f: &Fixture, leave_type: LeaveType) -> LeaveRequest {
        f.ledger
            .apply(f.employee.id, leave_type, date(10), date(12), "Family wedding in Pune")
            .unwrap()
    }

    #[test]
    fn test_apply_creates_pending_request() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        assert_eq!(request.days, 3);
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.reason, "Family wedding in Pune");
        assert_eq!(f.ledger.pending_requests().unwrap().len(), 1);
    }

    #[test]
    fn test_apply_short_reason() {
        let f = fixture();
        let result = f
            .ledger
            .apply(f.employee.id, LeaveType::Paid, date(10), date(12), "  trip   ");
        assert!(matches!(result, Err(LedgerError::ValidationFailed { field, .. }) if field == "reason"));
    }

    #[test]
    fn test_apply_reversed_dates() {
        let f = fixture();
        let result = f.ledger.apply(
            f.employee.id,
            LeaveType::Paid,
            date(12),
            date(10),
            "Family wedding in Pune",
        );
        assert!(matches!(result, Err(LedgerError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_apply_zero_balance() {
        let f = fixture_with(LeavePolicy::default(), LeaveBalance::new(12, 0, 5));
        let result = f.ledger.apply(
            f.employee.id,
            LeaveType::Sick,
            date(10),
            date(10),
            "Food poisoning again",
        );
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { leave_type: LeaveType::Sick, available: 0, requested: 1 })
        ));
    }

    #[test]
    fn test_apply_positive_check_allows_more_days_than_balance() {
        let f = fixture_with(LeavePolicy::default(), LeaveBalance::new(1, 10, 5));
        let request = apply_three_days(&f, LeaveType::Paid);
        assert_eq!(request.days, 3);
    }

    #[test]
    fn test_apply_covers_days_check() {
        let policy = LeavePolicy {
            balance_check: BalanceCheck::CoversDays,
            ..LeavePolicy::default()
        };
        let f = fixture_with(policy, LeaveBalance::new(2, 10, 5));
        let result = f.ledger.apply(
            f.employee.id,
            LeaveType::Paid,
            date(10),
            date(12),
            "Family wedding in Pune",
        );
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { available: 2, requested: 3, .. })));
    }

    #[test]
    fn test_apply_unknown_employee() {
        let f = fixture();
        let result = f.ledger.apply(
            Uuid::new_v4(),
            LeaveType::Paid,
            date(10),
            date(12),
            "Family wedding in Pune",
        );
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_approve_charges_balance_and_notifies() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        let approved = f
            .ledger
            .approve(request.id, f.hr.id, Some("Enjoy".to_string()))
            .unwrap();

        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.reviewed_by, Some(f.hr.id));
        assert!(approved.reviewed_date.is_some());
        assert_eq!(approved.comments.as_deref(), Some("Enjoy"));

        let balance = balance_of(&f);
        assert_eq!(balance.paid, 9);
        assert_eq!(balance.used, 3);
        assert_eq!(balance.remaining, 24);

        let sent = f.notifier.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::LeaveApproved);
        assert_eq!(sent[0].user_id, f.employee.id);
    }

    #[test]
    fn test_approve_twice_is_already_processed() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        f.ledger.approve(request.id, f.hr.id, None).unwrap();
        let again = f.ledger.approve(request.id, f.hr.id, None);
        assert!(matches!(again, Err(LedgerError::AlreadyProcessed { .. })));
        let reject = f.ledger.reject(request.id, f.hr.id, None);
        assert!(matches!(reject, Err(LedgerError::AlreadyProcessed { .. })));
        assert_eq!(balance_of(&f).paid, 9);
    }

    #[test]
    fn test_approve_unknown_request() {
        let f = fixture();
        let result = f.ledger.approve(Uuid::new_v4(), f.hr.id, None);
        assert!(matches!(result, Err(LedgerError::NotFound { entity: "leave request", .. })));
    }

    #[test]
    fn test_approve_overdraw_permitted_by_default() {
        let f = fixture_with(LeavePolicy::default(), LeaveBalance::new(1, 10, 5));
        let request = apply_three_days(&f, LeaveType::Paid);
        f.ledger.approve(request.id, f.hr.id, None).unwrap();
        let balance = balance_of(&f);
        assert_eq!(balance.paid, -2);
        assert_eq!(balance.remaining, 13);
    }

    #[test]
    fn test_approve_overdraw_rejected_in_strict_mode() {
        let policy = LeavePolicy {
            overdraw: Overdraw::Reject,
            ..LeavePolicy::default()
        };
        let f = fixture_with(policy, LeaveBalance::new(1, 10, 5));
        let request = apply_three_days(&f, LeaveType::Paid);
        let result = f.ledger.approve(request.id, f.hr.id, None);
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert!(f.ledger.request(request.id).unwrap().unwrap().is_pending());
        assert_eq!(balance_of(&f).paid, 1);
        assert!(f.notifier.notifications().is_empty());
    }

    #[test]
    fn test_reject_leaves_balance_and_notifies() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Sick);
        let rejected = f
            .ledger
            .reject(request.id, f.hr.id, Some("Busy week".to_string()))
            .unwrap();
        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(balance_of(&f), LeaveBalance::new(12, 10, 5));
        assert_eq!(f.notifier.notifications()[0].kind, NotificationKind::LeaveRejected);
    }

    #[test]
    fn test_delete_by_owner_keeps_charged_balance() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        f.ledger.approve(request.id, f.hr.id, None).unwrap();
        let removed = f.ledger.delete(request.id, f.employee.id).unwrap();
        assert_eq!(removed.status, LeaveStatus::Approved);
        assert!(f.ledger.request(request.id).unwrap().is_none());
        assert_eq!(balance_of(&f).paid, 9);
    }

    #[test]
    fn test_delete_by_hr() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        assert!(f.ledger.delete(request.id, f.hr.id).is_ok());
    }

    #[test]
    fn test_delete_by_other_employee_refused() {
        let f = fixture();
        let other = hire("EMP002", Role::Employee, LeaveBalance::new(1, 1, 1));
        f.store.save_employee(&other).unwrap();
        let request = apply_three_days(&f, LeaveType::Paid);
        let result = f.ledger.delete(request.id, other.id);
        assert!(matches!(result, Err(LedgerError::NotPermitted { .. })));
        assert!(f.ledger.request(request.id).unwrap().is_some());
    }

    #[test]
    fn test_add_comment_after_review() {
        let f = fixture();
        let request = apply_three_days(&f, LeaveType::Paid);
        f.ledger.reject(request.id, f.hr.id, None).unwrap();
        let updated = f.ledger.add_comment(request.id, "Please reapply next month").unwrap();
        assert_eq!(updated.comments.as_deref(), Some("Please reapply next month"));
        assert_eq!(updated.status, LeaveStatus::Rejected);
    }

    #[test]
    fn test_requests_for_employee() {
        let f = fixture();
        apply_three_days(&f, LeaveType::Paid);
        apply_three_days(&f, LeaveType::Sick);
        assert_eq!(f.ledger.requests_for(f.employee.id).unwrap().len(), 2);
        assert!(f.ledger.requests_for(f.hr.id).unwrap().is_empty());
    }
}
