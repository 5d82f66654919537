use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{any, get, post},
};
use tracing::warn;

use crate::state::AppState;
use crate::{auth, recipes, users};

/// All API routes plus the global not-found fallback.
///
/// Static pages are mounted by the caller with `merge`; this router owns the
/// only fallback. Bodies are unbounded so every request reaches the
/// rate-limit gate in its handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(users::register))
        .route("/api/login", any(auth::login))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/{id}",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_response(&state).await
}

/// 404 with the configured HTML page, or plain text when there is none.
pub async fn not_found_response(state: &AppState) -> Response {
    if let Some(path) = &state.config.not_found_page {
        match tokio::fs::read_to_string(path).await {
            Ok(page) => return (StatusCode::NOT_FOUND, Html(page)).into_response(),
            Err(e) => warn!("Failed to read not-found page {}: {}", path.display(), e),
        }
    }
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
