//! Data models for password recovery

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    /// Registered, email not yet confirmed
    Created,
    /// Confirmed and active
    Activated,
    Deactivated,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Created => "created",
            UserStatus::Activated => "activated",
            UserStatus::Deactivated => "deactivated",
            UserStatus::Blocked => "blocked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(UserStatus::Created),
            "activated" => Some(UserStatus::Activated),
            "deactivated" => Some(UserStatus::Deactivated),
            "blocked" => Some(UserStatus::Blocked),
            _ => None,
        }
    }
}

/// A user account as seen by the recovery flow
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    /// The outstanding recovery request, if any (at most one per user)
    pub recovery_request: Option<RecoveryRequest>,
}

/// An outstanding password recovery request
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryRequest {
    pub user_id: UserId,
    pub token: String,
    pub expiry_date: DateTime<Utc>,
}

impl RecoveryRequest {
    /// A request expiring exactly at `now` is still valid
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}

/// Outbound message asking the delivery side to mail a recovery token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryNotification {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub token: String,
    pub language: String,
}

/// Emitted once a token has been consumed; the password itself is changed by a listener
#[derive(Clone, PartialEq)]
pub struct PasswordUpdateEvent {
    /// Tag identifying the emitter
    pub source: &'static str,
    pub new_password: String,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl PasswordUpdateEvent {
    pub fn new(source: &'static str, new_password: impl Into<String>, user_id: UserId) -> Self {
        Self {
            source,
            new_password: new_password.into(),
            user_id,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Debug for PasswordUpdateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordUpdateEvent")
            .field("source", &self.source)
            .field("new_password", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
