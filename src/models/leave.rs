//! Leave request model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::inclusive_day_count;
use crate::error::LedgerResult;

/// Leave category, each with its own entitlement counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid leave.
    Paid,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeaveType::Paid => "paid",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
        };
        f.write_str(name)
    }
}

/// Review state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved, balance charged.
    Approved,
    /// Rejected.
    Rejected,
}

/// A request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: Uuid,
    /// Leave category.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count, derived from the dates.
    pub days: i64,
    /// Reason given by the employee.
    pub reason: String,
    /// Review state.
    pub status: LeaveStatus,
    /// When the request was made.
    pub applied_date: DateTime<Utc>,
    /// Who reviewed the request.
    pub reviewed_by: Option<Uuid>,
    /// When the request was reviewed.
    pub reviewed_date: Option<DateTime<Utc>>,
    /// Reviewer or follow-up comments.
    pub comments: Option<String>,
}

impl LeaveRequest {
    /// Creates a pending request, deriving `days` from the dates.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start_date` is after `end_date`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{NaiveDate, Utc};
    /// use hr_ledger::models::{LeaveRequest, LeaveType};
    /// use uuid::Uuid;
    ///
    /// let request = LeaveRequest::new(
    ///     Uuid::new_v4(),
    ///     LeaveType::Paid,
    ///     NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
    ///     "Family wedding out of town",
    ///     Utc::now(),
    /// )
    /// .unwrap();
    /// assert_eq!(request.days, 3);
    /// ```
    pub fn new(
        employee_id: Uuid,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
        applied_date: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        let days = inclusive_day_count(start_date, end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            employee_id,
            leave_type,
            start_date,
            end_date,
            days,
            reason: reason.into(),
            status: LeaveStatus::Pending,
            applied_date,
            reviewed_by: None,
            reviewed_date: None,
            comments: None,
        })
    }

    /// Returns true while the request awaits review.
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    /// Records a review outcome. Callers check [`LeaveRequest::is_pending`] first.
    pub(crate) fn mark_reviewed(
        &mut self,
        status: LeaveStatus,
        reviewer_id: Uuid,
        at: DateTime<Utc>,
        comments: Option<String>,
    ) {
        self.status = status;
        self.reviewed_by = Some(reviewer_id);
        self.reviewed_date = Some(at);
        if comments.is_some() {
            self.comments = comments;
        }
    }
}
