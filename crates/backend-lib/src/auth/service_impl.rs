use std::sync::Arc;

use metrics::counter;

use crate::auth::{AuthService, CredentialStore, HashParams, TokenService, VirtualProfile};
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS};
use crate::storage::{UserRecord, UserStore};

pub struct DefaultAuth {
    credentials: CredentialStore,
    tokens: TokenService,
}

impl DefaultAuth {
    /// `params` is the hashing cost for new accounts only
    pub fn new(store: Arc<dyn UserStore>, params: HashParams) -> Self {
        let tokens = TokenService::new(store.clone());
        let credentials = CredentialStore::new(store, params);
        Self {
            credentials,
            tokens,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

impl AuthService for DefaultAuth {
    fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserRecord, AppError> {
        self.credentials.add_user(username, password, email)
    }

    fn login(&self, id: i64, password: &str) -> Result<String, AppError> {
        let record = self.credentials.lookup_by_id(id)?;
        let profile = VirtualProfile::from(&record);
        if !profile.does_password_match(password) {
            counter!(LOGIN_FAILURE).increment(1);
            tracing::info!(user_id = id, "login rejected: password mismatch");
            return Err(AppError::PasswordMismatch);
        }

        let token = self.tokens.issue(&record)?;
        counter!(LOGIN_SUCCESS).increment(1);
        tracing::info!(user_id = id, "login succeeded");
        Ok(token)
    }

    fn auth_to_user_id(&self, token: &str) -> Result<i64, AppError> {
        self.tokens.token_to_user_id(token)
    }

    fn user_by_id(&self, id: i64) -> Result<UserRecord, AppError> {
        self.credentials.lookup_by_id(id)
    }

    fn user_by_username(&self, username: &str) -> Result<UserRecord, AppError> {
        self.credentials.lookup_by_username(username)
    }
}
