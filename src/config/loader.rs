//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger
//! policy from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

use super::types::LedgerConfig;

/// Loads and provides access to the ledger configuration.
///
/// # File Format
///
/// ```text
/// attendance:
///   full_day_hours: "8"
///   half_day_hours: "4"
///   reversed_times: permissive   # permissive | clamp | reject
/// leave:
///   min_reason_length: 10
///   balance_check: positive      # positive | covers_days
///   overdraw: permit             # permit | reject
///   entitlement: { paid: 12, sick: 10, unpaid: 5 }
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ledger.yaml").unwrap();
/// println!("Half day from {} hours", loader.config().attendance.half_day_hours);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if the file cannot be read
    /// - `ConfigParseError` if the file is not valid for [`LedgerConfig`]
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::from_yaml(&content).map_err(|e| match e {
            LedgerError::ConfigParseError { message, .. } => LedgerError::ConfigParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path_str, "Loaded ledger configuration");
        Ok(loader)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(content: &str) -> LedgerResult<Self> {
        let config: LedgerConfig =
            serde_yaml::from_str(content).map_err(|e| LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(Self { config })
    }

    fn validate(config: &LedgerConfig) -> LedgerResult<()> {
        let attendance = &config.attendance;
        if attendance.half_day_hours.is_sign_negative()
            || attendance.half_day_hours > attendance.full_day_hours
        {
            return Err(LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: format!(
                    "half_day_hours ({}) must be between 0 and full_day_hours ({})",
                    attendance.half_day_hours, attendance.full_day_hours
                ),
            });
        }
        let entitlement = &config.leave.entitlement;
        if entitlement.paid < 0 || entitlement.sick < 0 || entitlement.unpaid < 0 {
            return Err(LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: "leave entitlement must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }
}
