//! Storage abstractions consumed by the recovery service

use std::sync::Arc;

use crate::error::RecoveryError;
use crate::models::{RecoveryRequest, User};

/// Result type for store operations
pub type StoreResult<T> = Result<T, RecoveryError>;

/// Read-only view of the user directory
pub trait UserStore: Send + Sync {
    /// Get a user by email address, with their pending recovery request attached
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Trait for recovery request storage
///
/// Implementations must reject a second request for the same user with
/// [`RecoveryError::InvalidEmailState`].
pub trait RecoveryRequestStore: Send + Sync {
    /// Get a recovery request by token
    fn find_by_token(&self, token: &str) -> StoreResult<Option<RecoveryRequest>>;

    /// Store a new recovery request
    fn save(&self, request: &RecoveryRequest) -> StoreResult<()>;

    /// Delete a recovery request, returning whether it was still present
    fn delete(&self, request: &RecoveryRequest) -> StoreResult<bool>;

    /// Delete every request whose expiry date is before now
    fn delete_all_expired_password_reset_tokens(&self) -> StoreResult<u64>;
}

impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        (**self).find_by_email(email)
    }
}

impl<T: RecoveryRequestStore + ?Sized> RecoveryRequestStore for Arc<T> {
    fn find_by_token(&self, token: &str) -> StoreResult<Option<RecoveryRequest>> {
        (**self).find_by_token(token)
    }

    fn save(&self, request: &RecoveryRequest) -> StoreResult<()> {
        (**self).save(request)
    }

    fn delete(&self, request: &RecoveryRequest) -> StoreResult<bool> {
        (**self).delete(request)
    }

    fn delete_all_expired_password_reset_tokens(&self) -> StoreResult<u64> {
        (**self).delete_all_expired_password_reset_tokens()
    }
}
