//! Read-only snapshot of a stored user.
use crate::auth::password::{verify_password, HashParams};
use crate::auth::token::derive_token;
use crate::error::AppError;
use crate::storage::UserRecord;

/// A detached view of a user record. Changing it never touches storage.
///
/// The stored hash is carried as-is; loading a profile does not hash it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualProfile {
    pub id: i64,
    pub username: String,
    pub password_hash: Vec<u8>,
    pub email: String,
    pub salt: Vec<u8>,
    pub hash_params: HashParams,
}

impl From<&UserRecord> for VirtualProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            password_hash: record.password_hash.clone(),
            email: record.email.clone(),
            salt: record.salt.clone(),
            hash_params: record.hash_params,
        }
    }
}

impl VirtualProfile {
    /// True when `candidate` hashes to the stored password hash
    pub fn does_password_match(&self, candidate: &str) -> bool {
        verify_password(&self.password_hash, &self.salt, candidate, self.hash_params)
    }

    /// The login token for this profile
    pub fn login_key(&self) -> Result<String, AppError> {
        derive_token(
            &self.username,
            &self.password_hash,
            &self.email,
            &self.salt,
            self.hash_params,
        )
    }
}
