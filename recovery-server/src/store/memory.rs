//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use recovery_core::{RecoveryError, RecoveryRequest, User, UserId, UserStatus};

use super::{AccountStore, RecoveryRequestStore, StoreResult, UserStore};

struct UserRecord {
    user: User,
    password_hash: String,
}

/// In-memory store implementing both UserStore and RecoveryRequestStore
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
    /// Recovery requests keyed by token
    requests: RwLock<HashMap<String, RecoveryRequest>>,
    next_user_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            requests: RwLock::new(HashMap::new()),
            next_user_id: AtomicU64::new(1),
        }
    }

    fn attach_request(&self, mut user: User) -> User {
        let requests = self.requests.read().unwrap();
        user.recovery_request = requests.values().find(|r| r.user_id == user.id).cloned();
        user
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryStore {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let user = self
            .users
            .read()
            .unwrap()
            .values()
            .find(|r| r.user.email == normalized)
            .map(|r| r.user.clone());
        Ok(user.map(|u| self.attach_request(u)))
    }
}

impl AccountStore for InMemoryStore {
    fn create_user(&self, name: &str, email: &str, status: UserStatus) -> StoreResult<UserId> {
        let normalized = email.to_lowercase();
        let mut users = self.users.write().unwrap();
        if users.values().any(|r| r.user.email == normalized) {
            return Err(RecoveryError::Storage(format!(
                "email already registered: {}",
                normalized
            )));
        }

        let id = UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        users.insert(
            id,
            UserRecord {
                user: User {
                    id,
                    name: name.to_string(),
                    email: normalized,
                    status,
                    recovery_request: None,
                },
                password_hash: String::new(),
            },
        );
        Ok(id)
    }

    fn update_password(&self, user_id: UserId, password_hash: &str) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        if let Some(record) = users.get_mut(&user_id) {
            record.password_hash = password_hash.to_string();
            Ok(())
        } else {
            Err(RecoveryError::UserNotFound)
        }
    }

    fn password_hash(&self, user_id: UserId) -> StoreResult<Option<String>> {
        let users = self.users.read().unwrap();
        Ok(users.get(&user_id).map(|r| r.password_hash.clone()))
    }
}

impl RecoveryRequestStore for InMemoryStore {
    fn find_by_token(&self, token: &str) -> StoreResult<Option<RecoveryRequest>> {
        Ok(self.requests.read().unwrap().get(token).cloned())
    }

    fn save(&self, request: &RecoveryRequest) -> StoreResult<()> {
        // Single write lock so the per-user check and the insert are atomic
        let mut requests = self.requests.write().unwrap();
        if requests.values().any(|r| r.user_id == request.user_id) {
            return Err(RecoveryError::InvalidEmailState);
        }
        if requests.contains_key(&request.token) {
            return Err(RecoveryError::Storage("duplicate recovery token".to_string()));
        }
        requests.insert(request.token.clone(), request.clone());
        Ok(())
    }

    fn delete(&self, request: &RecoveryRequest) -> StoreResult<bool> {
        Ok(self
            .requests
            .write()
            .unwrap()
            .remove(&request.token)
            .is_some())
    }

    fn delete_all_expired_password_reset_tokens(&self) -> StoreResult<u64> {
        let now = Utc::now();
        let mut requests = self.requests.write().unwrap();
        let before = requests.len();
        requests.retain(|_, r| !r.is_expired_at(now));
        Ok((before - requests.len()) as u64)
    }
}
