use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{NewRecipe, NewUser};

// -- Envelope --

/// Uniform success body for every non-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub status: String,
    pub message: String,
}

impl ResponseBody {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

// -- Users --

/// Missing fields decode as empty strings so the handler can report them
/// as a validation failure rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn all_present(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.password.is_empty()
    }

    pub fn all_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty() && self.password.is_empty()
    }

    pub fn into_new_user(self) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            password: self.password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn all_present(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn all_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub new_name: String,
}

// -- Recipes --

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: String,
    pub category: String,
    pub recipe_text: String,
    pub publisher_username: String,
    pub published_date: Option<DateTime<Utc>>,
}

impl CreateRecipeRequest {
    pub fn has_required_fields(&self) -> bool {
        !self.title.is_empty()
            && !self.category.is_empty()
            && !self.recipe_text.is_empty()
            && !self.publisher_username.is_empty()
    }

    pub fn into_new_recipe(self) -> NewRecipe {
        NewRecipe {
            title: self.title,
            category: self.category,
            recipe_text: self.recipe_text,
            publisher_username: self.publisher_username,
            published_date: self.published_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub new_title: String,
}

/// Query string of `GET /api/recipes`. `page` is kept raw because anything
/// that is not a positive integer falls back to the first page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecipeListParams {
    pub filter: String,
    pub sort: String,
    pub page: Option<String>,
}

impl RecipeListParams {
    /// Builds params from raw query pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        let (mut filter, mut sort) = (None, None);
        for (key, value) in pairs {
            match key.as_str() {
                "filter" => {
                    filter.get_or_insert(value);
                }
                "sort" => {
                    sort.get_or_insert(value);
                }
                "page" => {
                    params.page.get_or_insert(value);
                }
                _ => {}
            }
        }
        params.filter = filter.unwrap_or_default();
        params.sort = sort.unwrap_or_default();
        params
    }

    pub fn page_number(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}
