//! Attendance field derivation.
//!
//! Worked hours and status are never written directly by the ledger; they
//! are recomputed from the check-in/check-out pair by
//! [`derive_attendance_fields`] before every write.

use rust_decimal::Decimal;

use crate::config::{AttendancePolicy, ReversedTimes};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceRecord, AttendanceStatus};

use super::time_math::{format_time_of_day, hours_between};

/// Derives a status from worked hours.
///
/// `hours >= full_day_hours` is present, `half_day_hours <= hours < full_day_hours`
/// is a half day, anything shorter keeps `prior`.
///
/// # Example
///
/// ```
/// use hr_ledger::calculation::derive_status;
/// use hr_ledger::config::AttendancePolicy;
/// use hr_ledger::models::AttendanceStatus;
/// use rust_decimal::Decimal;
///
/// let policy = AttendancePolicy::default();
/// assert_eq!(
///     derive_status(Decimal::new(85, 1), AttendanceStatus::Absent, &policy),
///     AttendanceStatus::Present
/// );
/// assert_eq!(
///     derive_status(Decimal::new(2, 0), AttendanceStatus::Absent, &policy),
///     AttendanceStatus::Absent
/// );
/// ```
pub fn derive_status(
    hours: Decimal,
    prior: AttendanceStatus,
    policy: &AttendancePolicy,
) -> AttendanceStatus {
    if hours >= policy.full_day_hours {
        AttendanceStatus::Present
    } else if hours >= policy.half_day_hours {
        AttendanceStatus::HalfDay
    } else {
        prior
    }
}

/// Recomputes `hours` and `status` on an attendance record.
///
/// Records missing either time keep their hours and status untouched.
/// Records with `status_override` keep their status but still get fresh hours.
///
/// # Errors
///
/// `ValidationFailed` when the check-out precedes the check-in and the policy
/// is [`ReversedTimes::Reject`].
pub fn derive_attendance_fields(
    mut record: AttendanceRecord,
    policy: &AttendancePolicy,
) -> LedgerResult<AttendanceRecord> {
    let (Some(check_in), Some(check_out)) = (record.check_in, record.check_out) else {
        return Ok(record);
    };

    let mut hours = hours_between(check_in, check_out);
    if hours.is_sign_negative() && !hours.is_zero() {
        match policy.reversed_times {
            ReversedTimes::Permissive => {}
            ReversedTimes::Clamp => hours = Decimal::ZERO,
            ReversedTimes::Reject => {
                return Err(LedgerError::validation(
                    "check_out",
                    format!(
                        "{} is earlier than check-in {}",
                        format_time_of_day(check_out),
                        format_time_of_day(check_in)
                    ),
                ));
            }
        }
    }

    record.hours = hours;
    if !record.status_override {
        record.status = derive_status(hours, record.status, policy);
    }
    Ok(record)
}
