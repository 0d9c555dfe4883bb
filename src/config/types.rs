//! Configuration types for the ledger engine.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from the YAML configuration file. Every field has a default
//! so a partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LeaveBalance;

/// How a check-out earlier than the check-in is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversedTimes {
    /// Store the negative hours as computed.
    #[default]
    Permissive,
    /// Store zero hours.
    Clamp,
    /// Fail the write with a validation error.
    Reject,
}

/// Which balance check runs when leave is applied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceCheck {
    /// The category balance must be above zero.
    #[default]
    Positive,
    /// The category balance must cover every requested day.
    CoversDays,
}

/// Whether approval may push a balance below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overdraw {
    /// Charge the full request even if counters go negative.
    #[default]
    Permit,
    /// Refuse approval when the category cannot cover the request.
    Reject,
}

/// Attendance derivation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// Hours at or above which a day counts as present.
    pub full_day_hours: Decimal,
    /// Hours at or above which a day counts as a half day.
    pub half_day_hours: Decimal,
    /// Handling of check-outs before check-ins.
    pub reversed_times: ReversedTimes,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            full_day_hours: Decimal::new(8, 0),
            half_day_hours: Decimal::new(4, 0),
            reversed_times: ReversedTimes::default(),
        }
    }
}

/// Entitlement granted to a newly hired employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveEntitlement {
    /// Paid leave days.
    pub paid: i64,
    /// Sick leave days.
    pub sick: i64,
    /// Unpaid leave days.
    pub unpaid: i64,
}

impl Default for LeaveEntitlement {
    fn default() -> Self {
        Self {
            paid: 12,
            sick: 10,
            unpaid: 5,
        }
    }
}

impl LeaveEntitlement {
    /// A fresh balance holding this entitlement.
    pub fn to_balance(&self) -> LeaveBalance {
        LeaveBalance::new(self.paid, self.sick, self.unpaid)
    }
}

/// Leave accounting policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// Minimum trimmed length of a leave reason.
    pub min_reason_length: usize,
    /// Check applied when leave is requested.
    pub balance_check: BalanceCheck,
    /// Check applied when leave is approved.
    pub overdraw: Overdraw,
    /// Default entitlement for new hires.
    pub entitlement: LeaveEntitlement,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            min_reason_length: 10,
            balance_check: BalanceCheck::default(),
            overdraw: Overdraw::default(),
            entitlement: LeaveEntitlement::default(),
        }
    }
}

/// Top-level ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Attendance policy.
    pub attendance: AttendancePolicy,
    /// Leave policy.
    pub leave: LeavePolicy,
}

impl LedgerConfig {
    /// Configuration with every hardening switch turned on.
    pub fn strict() -> Self {
        Self {
            attendance: AttendancePolicy {
                reversed_times: ReversedTimes::Reject,
                ..AttendancePolicy::default()
            },
            leave: LeavePolicy {
                balance_check: BalanceCheck::CoversDays,
                overdraw: Overdraw::Reject,
                ..LeavePolicy::default()
            },
        }
    }
}
