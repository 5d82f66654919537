use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::ApiError;
use crate::router::not_found_response;
use crate::state::AppState;

/// `{id}` path segment restricted to `[0-9]+`.
///
/// Anything else is treated as an unmatched route: the request gets the
/// not-found page and never reaches the handler or the rate limiter.
#[derive(Debug, Clone)]
pub struct NumericId(pub String);

impl FromRequestParts<AppState> for NumericId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_found_response(state).await);
        }
        Ok(Self(raw))
    }
}

impl NumericId {
    /// Digits that overflow an `i64` are a bad request, not a missing route.
    pub fn parse(&self, invalid: &str) -> Result<i64, ApiError> {
        self.0.parse::<i64>().map_err(|e| {
            error!(error = %e, id = %self.0, "{}", invalid);
            ApiError::bad_request(invalid)
        })
    }
}

/// Decodes a JSON body after the rate-limit gate has been passed.
pub fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8], invalid: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "{}", invalid);
        ApiError::bad_request(invalid)
    })
}
