use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use cookbook_db::RepoError;

use crate::config::ApiConfig;

/// Terminal outcome of a failed request. Rendered as a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid username or password")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_string())
    }

    /// Maps a repository failure onto the HTTP error taxonomy.
    pub fn from_repo(err: RepoError, config: &ApiConfig) -> Self {
        match err {
            RepoError::NotFound if config.not_found_as_500 => Self::Internal(err.to_string()),
            RepoError::NotFound => Self::NotFound(err.to_string()),
            RepoError::Validation(msg) => Self::BadRequest(msg),
            RepoError::Storage(msg) => Self::Internal(msg),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
