use thiserror::Error;

/// Failure of a repository operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    /// No live row has the requested ID.
    #[error("record not found")]
    NotFound,

    /// The caller's input was rejected before reaching storage.
    #[error("{0}")]
    Validation(String),

    /// Anything the storage engine reported.
    #[error("{0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<rusqlite::Error> for RepoError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound,
            other => RepoError::Storage(other.to_string()),
        }
    }
}
