//! Server configuration

use std::time::Duration;

use recovery_core::config::{DEFAULT_EMAIL_TOPIC, DEFAULT_TOKEN_EXPIRATION_HOURS};
use recovery_core::{RecoveryConfig, RecoveryError};

use crate::messaging::SmtpConfig;
use crate::sweeper::DEFAULT_SWEEP_INTERVAL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// SQLite database file; None keeps everything in memory
    pub database_path: Option<String>,

    /// Token lifetime and notification topic
    pub recovery: RecoveryConfig,

    /// Time between expired token sweeps
    pub sweep_interval: Duration,

    /// SMTP configuration; None logs notifications to the console
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - PORT (default: 3000)
    /// - DATABASE_PATH
    /// - TOKEN_EXPIRATION_HOURS (default: 24, at most one year)
    /// - EMAIL_TOPIC (default: "email-topic")
    /// - SWEEP_INTERVAL_SECS (default: 3600)
    /// - SMTP_* (see [`SmtpConfig::from_env`])
    ///
    /// Fails when TOKEN_EXPIRATION_HOURS is out of range.
    pub fn from_env() -> Result<Self, RecoveryError> {
        fn get_env(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|s| !s.is_empty())
        }

        let defaults = Self::default();

        let config = Self {
            port: get_env("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            database_path: get_env("DATABASE_PATH"),
            recovery: RecoveryConfig {
                token_expiration_hours: get_env("TOKEN_EXPIRATION_HOURS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOKEN_EXPIRATION_HOURS),
                email_topic: get_env("EMAIL_TOPIC")
                    .unwrap_or_else(|| DEFAULT_EMAIL_TOPIC.to_string()),
            },
            sweep_interval: get_env("SWEEP_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            smtp: SmtpConfig::from_env(),
        };
        config.recovery.validate()?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_path: None,
            recovery: RecoveryConfig::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            smtp: None,
        }
    }
}
