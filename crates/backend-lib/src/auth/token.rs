// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Login token derivation and lookup.
//!
//! A login token is not random: it is the salted hash of the user's name,
//! password hash and email, so it can be rebuilt on every login and compared
//! against the copy written at sign-up. Nothing here writes to storage.
use std::sync::Arc;

use crate::auth::password::{constant_time_eq, hash_password, HashParams};
use crate::error::AppError;
use crate::storage::{UserRecord, UserStore};

/// Derive the login token for the given user fields.
///
/// The password hash is hex encoded (two characters per byte) before being
/// concatenated, and the resulting key is hex encoded as well.
pub fn derive_token(
    username: &str,
    password_hash: &[u8],
    email: &str,
    salt: &[u8],
    params: HashParams,
) -> Result<String, AppError> {
    let combined = format!("{username}{}{email}", hex::encode(password_hash));
    let key = hash_password(combined.as_bytes(), salt, params)?;
    Ok(hex::encode(key))
}

/// Issues login tokens and resolves them back to user ids
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn UserStore>,
}

impl TokenService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Recompute the token of a stored user with the cost it was created under.
    ///
    /// The result must equal the token written at sign-up; a mismatch means the
    /// row was altered outside this service and is reported as an internal error.
    pub fn issue(&self, record: &UserRecord) -> Result<String, AppError> {
        let token = derive_token(
            &record.username,
            &record.password_hash,
            &record.email,
            &record.salt,
            record.hash_params,
        )?;
        if !constant_time_eq(token.as_bytes(), record.auth_token.as_bytes()) {
            tracing::error!(user_id = record.id, "stored login token does not match its derivation");
            return Err(AppError::Internal(format!(
                "login token of user {} is inconsistent",
                record.id
            )));
        }
        Ok(token)
    }

    /// Look up the user owning `token`. Matching is exact and case-sensitive.
    pub fn token_to_user_id(&self, token: &str) -> Result<i64, AppError> {
        self.store
            .find_by_auth_token(token)?
            .map(|record| record.id)
            .ok_or_else(|| AppError::NotFound("no user for login token".to_string()))
    }
}
