// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================
//! Account creation, lookup and password checks.
use std::sync::Arc;

use metrics::counter;

use crate::auth::password::{generate_salt, hash_password, verify_password, HashParams};
use crate::auth::token::derive_token;
use crate::error::AppError;
use crate::metrics::USER_CREATED;
use crate::storage::{NewUser, UserRecord, UserStore};

/// Owns user records: creation, lookup and password verification.
///
/// `params` is the cost applied to new accounts. Existing accounts are always
/// checked with the cost stored on their own row.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn UserStore>,
    params: HashParams,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn UserStore>, params: HashParams) -> Self {
        Self { store, params }
    }

    /// Create a user. Fails with `DuplicateUsername` when the name is taken.
    pub fn add_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserRecord, AppError> {
        let salt = generate_salt();
        let password_hash = hash_password(password.as_bytes(), &salt, self.params)?;
        let auth_token = derive_token(username, &password_hash, email, &salt, self.params)?;

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            salt,
            auth_token,
            hash_params: self.params,
        };

        let Some(id) = self.store.insert_user_if_absent(&new_user)? else {
            tracing::info!(username, "rejected sign-up for existing username");
            return Err(AppError::DuplicateUsername(username.to_string()));
        };

        counter!(USER_CREATED).increment(1);
        tracing::info!(user_id = id, username, "user created");

        Ok(UserRecord {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            salt: new_user.salt,
            auth_token: new_user.auth_token,
            hash_params: new_user.hash_params,
        })
    }

    pub fn lookup_by_id(&self, id: i64) -> Result<UserRecord, AppError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    pub fn lookup_by_username(&self, username: &str) -> Result<UserRecord, AppError> {
        self.store
            .find_by_username(username)?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))
    }

    /// Hash `candidate` with the record's salt and cost and compare to the stored hash
    pub fn verify_password(&self, record: &UserRecord, candidate: &str) -> bool {
        verify_password(
            &record.password_hash,
            &record.salt,
            candidate,
            record.hash_params,
        )
    }
}
