//! Configuration loading and management for the HR ledger engine.
//!
//! This module loads the ledger policy (attendance thresholds, leave
//! accounting switches, default entitlements) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use hr_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ledger.yaml").unwrap();
//! println!("Minimum reason length: {}", config.config().leave.min_reason_length);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, BalanceCheck, LeaveEntitlement, LeavePolicy, LedgerConfig, Overdraw,
    ReversedTimes,
};
