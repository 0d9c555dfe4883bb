//! Attendance record model.
//!
//! Check-in and check-out times travel as `HH:MM` strings on the wire and
//! are held as [`NaiveTime`] in memory.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attendance status for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Full day worked.
    Present,
    /// No qualifying attendance.
    #[default]
    Absent,
    /// Between the half-day and full-day thresholds.
    HalfDay,
    /// On approved leave.
    Leave,
}

/// One attendance record per employee per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee.
    pub employee_id: Uuid,
    /// The calendar day.
    pub date: NaiveDate,
    /// Check-in time of day.
    #[serde(with = "hhmm_option", default)]
    pub check_in: Option<NaiveTime>,
    /// Check-out time of day.
    #[serde(with = "hhmm_option", default)]
    pub check_out: Option<NaiveTime>,
    /// Worked hours, derived from the times.
    pub hours: Decimal,
    /// Attendance status.
    pub status: AttendanceStatus,
    /// Set when an administrator fixed the status explicitly.
    #[serde(default)]
    pub status_override: bool,
}

impl AttendanceRecord {
    /// Creates an empty record for `employee_id` on `date`.
    pub fn new(employee_id: Uuid, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            date,
            check_in: None,
            check_out: None,
            hours: Decimal::ZERO,
            status: AttendanceStatus::Absent,
            status_override: false,
        }
    }

    /// Returns true once both times are recorded.
    pub fn is_complete(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }
}

/// Serde adapter for optional `HH:MM` times.
mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::calculation::{format_time_of_day, parse_time_of_day};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format_time_of_day(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_time_of_day(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
