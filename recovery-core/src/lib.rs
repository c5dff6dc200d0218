//! Password recovery core
//!
//! Owns the lifecycle of recovery tokens:
//! - Users request a recovery email and receive a single-use token
//! - A valid, unexpired token authorizes exactly one password change
//! - Expired tokens are swept in bulk by an external scheduler

pub mod config;
pub mod error;
pub mod messaging;
pub mod models;
pub mod service;
pub mod store;
pub mod token;

pub use config::RecoveryConfig;
pub use error::RecoveryError;
pub use messaging::{EventPublisher, MessageSender, PASSWORD_RECOVERY_ROUTING_KEY};
pub use models::{
    PasswordUpdateEvent, RecoveryNotification, RecoveryRequest, User, UserId, UserStatus,
};
pub use service::PasswordRecoveryService;
pub use store::{RecoveryRequestStore, StoreResult, UserStore};
pub use token::{TokenGenerator, UuidTokenGenerator};

/// Result type for recovery-core operations
pub type Result<T> = std::result::Result<T, RecoveryError>;
