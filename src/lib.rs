//! HR Ledger Engine
//!
//! This crate implements the record-keeping core of an HR system: daily
//! attendance with derived hours and status, leave requests with balance
//! accounting, and monthly payroll records derived from each employee's
//! salary structure.
//!
//! The ledgers in [`ledger`] persist through the repository traits in
//! [`store`], read the time from an injected [`clock::Clock`], and report
//! reviews and payments through a [`notify::Notifier`]. Policy knobs live in
//! [`config`].

#![warn(missing_docs)]

pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod store;
