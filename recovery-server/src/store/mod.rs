//! Storage implementations for the recovery server

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use recovery_core::{UserId, UserStatus};

pub use memory::InMemoryStore;
pub use recovery_core::store::{RecoveryRequestStore, StoreResult, UserStore};
pub use sqlite::SqliteStore;

/// Write access to user accounts, used by the password updater and seeding
pub trait AccountStore: UserStore {
    /// Create a new user
    fn create_user(&self, name: &str, email: &str, status: UserStatus) -> StoreResult<UserId>;

    /// Replace a user's password hash
    fn update_password(&self, user_id: UserId, password_hash: &str) -> StoreResult<()>;

    /// Get a user's password hash (None for unknown users)
    fn password_hash(&self, user_id: UserId) -> StoreResult<Option<String>>;
}

impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    fn create_user(&self, name: &str, email: &str, status: UserStatus) -> StoreResult<UserId> {
        (**self).create_user(name, email, status)
    }

    fn update_password(&self, user_id: UserId, password_hash: &str) -> StoreResult<()> {
        (**self).update_password(user_id, password_hash)
    }

    fn password_hash(&self, user_id: UserId) -> StoreResult<Option<String>> {
        (**self).password_hash(user_id)
    }
}
