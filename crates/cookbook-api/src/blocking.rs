use cookbook_db::{RepoError, RepoResult};
use tracing::error;

/// Runs a synchronous repository call off the async runtime.
pub async fn run_blocking<F, T>(f: F) -> RepoResult<T>
where
    F: FnOnce() -> RepoResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        RepoError::Storage(format!("repository task failed: {}", e))
    })?
}
