//! Error types for password recovery

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("User not found")]
    UserNotFound,

    #[error("A password recovery request is already pending for this email")]
    InvalidEmailState,

    #[error("Invalid recovery token")]
    InvalidToken,

    #[error("Recovery token expired")]
    TokenExpired,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Event publish error: {0}")]
    EventPublish(String),
}
