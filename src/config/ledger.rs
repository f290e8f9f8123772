use crate::core::{AppError, Result};
use std::env;
use std::time::Duration;

/// Settings for document writes and the overdue sweep
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Seconds between overdue sweeps
    pub overdue_check_interval_secs: u64,
    /// Total load/apply/save attempts before a version conflict is surfaced
    pub max_write_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            overdue_check_interval_secs: 3600,
            max_write_attempts: 3,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(LedgerConfig {
            overdue_check_interval_secs: env::var("OVERDUE_CHECK_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid OVERDUE_CHECK_INTERVAL_SECS".to_string())
                })?,
            max_write_attempts: env::var("MAX_WRITE_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid MAX_WRITE_ATTEMPTS".to_string()))?,
        })
    }

    pub fn overdue_check_interval(&self) -> Duration {
        Duration::from_secs(self.overdue_check_interval_secs)
    }
}
