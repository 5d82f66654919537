use axum::{Json, body::Bytes, extract::State};
use tracing::{error, info};

use cookbook_types::api::{RegisterRequest, ResponseBody, UpdateUserRequest};
use cookbook_types::models::User;

use crate::blocking::run_blocking;
use crate::error::ApiError;
use crate::extract::{NumericId, decode_json};
use crate::state::AppState;

const INVALID_ID: &str = "Invalid user ID";

/// GET /api/users/{id}: the envelope message is the username.
pub async fn get_user(
    State(state): State<AppState>,
    id: NumericId,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let user_id = id.parse(INVALID_ID)?;

    let st = state.clone();
    let user = run_blocking(move || st.users.get_by_id(user_id))
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Error getting user by ID");
            state.repo_error(e)
        })?;

    info!(user_id, "Retrieved user by ID");
    Ok(Json(ResponseBody::success(user.username)))
}

/// PUT /api/users/{id} with `{"newName": ...}`.
pub async fn update_user(
    State(state): State<AppState>,
    id: NumericId,
    body: Bytes,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let user_id = id.parse(INVALID_ID)?;
    let req: UpdateUserRequest = decode_json(&body, "Invalid request body")?;

    let st = state.clone();
    let new_name = req.new_name.clone();
    run_blocking(move || st.users.update_field(user_id, &new_name))
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Error updating user name");
            state.repo_error(e)
        })?;

    info!(user_id, new_name = %req.new_name, "User name updated");
    Ok(Json(ResponseBody::success("User successfully updated")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    id: NumericId,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let user_id = id.parse(INVALID_ID)?;

    let st = state.clone();
    run_blocking(move || st.users.delete(user_id))
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Error deleting user");
            state.repo_error(e)
        })?;

    info!(user_id, "User deleted");
    Ok(Json(ResponseBody::success("User successfully deleted")))
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let req: RegisterRequest = decode_json(&body, "Invalid request body")?;

    if !state
        .config
        .fields_acceptable(req.all_present(), req.all_empty())
    {
        error!("Invalid JSON message");
        return Err(ApiError::bad_request("Invalid JSON message"));
    }

    let username = req.username.clone();
    let st = state.clone();
    let new_user = req.into_new_user();
    let user_id = run_blocking(move || st.users.create(&new_user))
        .await
        .map_err(|e| {
            error!(error = %e, "Error creating user");
            ApiError::Internal("Error creating user".to_string())
        })?;

    info!(user_id, username = %username, "New user registered");
    Ok(Json(ResponseBody::success(format!(
        "New user successfully registered {}",
        username
    ))))
}

/// GET /api/users: bare array, no envelope.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    state.admit()?;

    let st = state.clone();
    let users = run_blocking(move || st.users.get_all())
        .await
        .map_err(|e| {
            error!(error = %e, "Error getting all users");
            state.repo_error(e)
        })?;

    info!(user_count = users.len(), "Retrieved all users");
    Ok(Json(users))
}
