//! Hashing of passwords chosen through a recovery token
//!
//! The recovery service hands the plaintext to the password updater inside a
//! [`PasswordUpdateEvent`](recovery_core::PasswordUpdateEvent); only the bcrypt
//! digest produced here ever reaches the user store.

/// bcrypt work factor for recovered passwords
pub const BCRYPT_COST: u32 = 12;

/// Digest a newly chosen password for storage
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Check a login attempt against a stored digest
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
