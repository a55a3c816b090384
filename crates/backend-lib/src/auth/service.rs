use crate::error::AppError;
use crate::storage::UserRecord;

/// Account operations exposed to the HTTP layer.
///
/// Every call is synchronous and may block on hashing or the database.
pub trait AuthService: Send + Sync {
    fn create_user(&self, username: &str, password: &str, email: &str)
        -> Result<UserRecord, AppError>;
    fn login(&self, id: i64, password: &str) -> Result<String, AppError>;
    fn auth_to_user_id(&self, token: &str) -> Result<i64, AppError>;
    fn user_by_id(&self, id: i64) -> Result<UserRecord, AppError>;
    fn user_by_username(&self, username: &str) -> Result<UserRecord, AppError>;
}
