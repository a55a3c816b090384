//! HTTP handlers.

pub mod assets;
pub mod user;

use crate::error::AppError;

/// Run blocking work (hashing, SQLite, file reads) off the async workers
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
}
