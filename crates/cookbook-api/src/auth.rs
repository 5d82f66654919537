use axum::{Json, body::Bytes, extract::State, http::Method};
use tracing::{error, info, warn};

use cookbook_types::api::{LoginRequest, ResponseBody};

use crate::blocking::run_blocking;
use crate::error::ApiError;
use crate::extract::decode_json;
use crate::state::AppState;

/// POST /api/login
///
/// Credentials are compared in cleartext against a scan of every user.
/// On a mismatch the historical behaviour is 200 with an empty message;
/// `ApiConfig::login_mismatch_unauthorized` turns that into a 401.
pub async fn login(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;

    if method != Method::POST {
        error!(%method, "Method not allowed");
        return Err(ApiError::MethodNotAllowed);
    }

    let req: LoginRequest = decode_json(&body, "Invalid JSON format")?;
    if !state
        .config
        .fields_acceptable(req.all_present(), req.all_empty())
    {
        error!("Invalid JSON message");
        return Err(ApiError::bad_request("Invalid JSON message"));
    }

    let strict = state.config.login_mismatch_unauthorized;
    let st = state.clone();
    let users = match run_blocking(move || st.users.get_all()).await {
        Ok(users) => users,
        Err(e) if strict => {
            error!(error = %e, "Error finding user");
            return Err(state.repo_error(e));
        }
        Err(e) => {
            error!(error = %e, "Error finding user");
            Vec::new()
        }
    };

    let matched = users
        .iter()
        .any(|u| u.username == req.username && u.password == req.password);

    if matched {
        info!(username = %req.username, "User logged in");
        return Ok(Json(ResponseBody::success(format!(
            "You successfully logged in {}",
            req.username
        ))));
    }

    if strict {
        warn!(username = %req.username, "Login rejected");
        return Err(ApiError::Unauthorized);
    }

    info!(username = %req.username, "Login attempt matched no user");
    Ok(Json(ResponseBody::success("")))
}
