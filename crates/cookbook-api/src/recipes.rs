use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::{error, info, warn};

use cookbook_db::{DEFAULT_PAGE_SIZE, RecipeQuery, RecipeSort};
use cookbook_types::api::{CreateRecipeRequest, RecipeListParams, ResponseBody, UpdateRecipeRequest};
use cookbook_types::models::Recipe;

use crate::blocking::run_blocking;
use crate::error::ApiError;
use crate::extract::{NumericId, decode_json};
use crate::state::AppState;

const INVALID_ID: &str = "Invalid recipe ID";

/// GET /api/recipes/{id}: the envelope message is the title.
pub async fn get_recipe(
    State(state): State<AppState>,
    id: NumericId,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let recipe_id = id.parse(INVALID_ID)?;

    let st = state.clone();
    let recipe = run_blocking(move || st.recipes.get_by_id(recipe_id))
        .await
        .map_err(|e| {
            error!(error = %e, recipe_id, "Error getting recipe by ID");
            state.repo_error(e)
        })?;

    info!(recipe_id, "Retrieved recipe by ID");
    Ok(Json(ResponseBody::success(recipe.title)))
}

/// PUT /api/recipes/{id} with `{"newTitle": ...}`.
pub async fn update_recipe(
    State(state): State<AppState>,
    id: NumericId,
    body: Bytes,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let recipe_id = id.parse(INVALID_ID)?;
    let req: UpdateRecipeRequest = decode_json(&body, "Invalid request body")?;

    let st = state.clone();
    let new_title = req.new_title.clone();
    run_blocking(move || st.recipes.update_field(recipe_id, &new_title))
        .await
        .map_err(|e| {
            error!(error = %e, recipe_id, "Error updating recipe title");
            state.repo_error(e)
        })?;

    info!(recipe_id, new_title = %req.new_title, "Recipe title updated");
    Ok(Json(ResponseBody::success("Recipe title successfully updated")))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    id: NumericId,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let recipe_id = id.parse(INVALID_ID)?;

    let st = state.clone();
    run_blocking(move || st.recipes.delete(recipe_id))
        .await
        .map_err(|e| {
            error!(error = %e, recipe_id, "Error deleting recipe");
            state.repo_error(e)
        })?;

    info!(recipe_id, "Recipe deleted");
    Ok(Json(ResponseBody::success("Recipe successfully deleted")))
}

/// POST /api/recipes: everything but `publishedDate` is required.
pub async fn create_recipe(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResponseBody>, ApiError> {
    state.admit()?;
    let req: CreateRecipeRequest = decode_json(&body, "Invalid request body")?;

    if !req.has_required_fields() {
        error!("Missing required fields");
        return Err(ApiError::bad_request("Missing required fields"));
    }

    let title = req.title.clone();
    let st = state.clone();
    let new_recipe = req.into_new_recipe();
    let recipe_id = run_blocking(move || st.recipes.create(&new_recipe))
        .await
        .map_err(|e| {
            error!(error = %e, "Error creating recipe");
            ApiError::Internal("Error creating recipe".to_string())
        })?;

    info!(recipe_id, recipe_title = %title, "Recipe created");
    Ok(Json(ResponseBody::success("Recipe successfully created")))
}

/// GET /api/recipes?filter=&sort=&page=: bare array, 12 per page.
pub async fn list_recipes(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    state.admit()?;

    // An unparseable query string lists the first unfiltered page.
    let params = match pairs {
        Ok(Query(pairs)) => RecipeListParams::from_pairs(pairs),
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable recipe list query");
            RecipeListParams::default()
        }
    };

    let sort = RecipeSort::parse_optional(&params.sort).map_err(|e| {
        error!(error = %e, sort = %params.sort, "Invalid sort expression");
        state.repo_error(e)
    })?;
    let query = RecipeQuery {
        filter: params.filter.clone(),
        sort,
        page: params.page_number(),
        limit: DEFAULT_PAGE_SIZE,
    };

    let st = state.clone();
    let recipes = run_blocking(move || st.recipes.list(&query))
        .await
        .map_err(|e| {
            error!(error = %e, "Error getting all recipes");
            state.repo_error(e)
        })?;

    info!(recipe_count = recipes.len(), "Retrieved all recipes");
    Ok(Json(recipes))
}
