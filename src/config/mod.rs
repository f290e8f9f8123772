use crate::core::{AppError, Result};
use std::env;

pub mod ledger;
pub mod server;

pub use ledger::LedgerConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
            },
            server: ServerConfig::from_env()?,
            ledger: LedgerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ledger.overdue_check_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Overdue check interval must be greater than 0".to_string(),
            ));
        }

        if self.ledger.max_write_attempts == 0 {
            return Err(AppError::Configuration(
                "Max write attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
