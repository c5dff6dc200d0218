//! Recovery configuration

use chrono::Duration;

use crate::error::RecoveryError;

/// Default lifetime of a recovery token
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 24 * 365;

/// Default destination for outbound recovery notifications
pub const DEFAULT_EMAIL_TOPIC: &str = "email-topic";

#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Hours a recovery token stays valid after issue
    pub token_expiration_hours: i64,

    /// Topic the recovery notification is published to
    pub email_topic: String,
}

impl RecoveryConfig {
    /// Reject token lifetimes outside `1..=MAX_TOKEN_EXPIRATION_HOURS`
    pub fn validate(&self) -> Result<(), RecoveryError> {
        self.token_lifetime().map(|_| ())
    }

    /// How long a freshly issued token stays valid
    pub fn token_lifetime(&self) -> Result<Duration, RecoveryError> {
        let hours = self.token_expiration_hours;
        if !(1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&hours) {
            return Err(RecoveryError::InvalidConfig(format!(
                "token expiration must be between 1 and {} hours, got {}",
                MAX_TOKEN_EXPIRATION_HOURS, hours
            )));
        }

        Duration::try_hours(hours).ok_or_else(|| {
            RecoveryError::InvalidConfig(format!("token expiration out of range: {} hours", hours))
        })
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            token_expiration_hours: DEFAULT_TOKEN_EXPIRATION_HOURS,
            email_topic: DEFAULT_EMAIL_TOPIC.to_string(),
        }
    }
}
