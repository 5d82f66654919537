use std::sync::Arc;

use cookbook_types::models::{NewRecipe, NewUser, Recipe, User};

use crate::Database;
use crate::error::RepoResult;
use crate::query::RecipeQuery;
use crate::repository::{RecipeRepository, Repository, UserRepository};

/// `UserRepository` over the shared SQLite database.
#[derive(Clone)]
pub struct SqliteUserRepository {
    db: Arc<Database>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Repository for SqliteUserRepository {
    type Entity = User;
    type New = NewUser;

    fn get_by_id(&self, id: i64) -> RepoResult<User> {
        self.db.get_user(id)
    }

    fn update_field(&self, id: i64, value: &str) -> RepoResult<()> {
        self.db.rename_user(id, value)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        self.db.soft_delete_user(id)
    }

    fn create(&self, new: &NewUser) -> RepoResult<i64> {
        self.db.insert_user(new)
    }
}

impl UserRepository for SqliteUserRepository {
    fn get_all(&self) -> RepoResult<Vec<User>> {
        self.db.list_users()
    }
}

/// `RecipeRepository` over the shared SQLite database.
#[derive(Clone)]
pub struct SqliteRecipeRepository {
    db: Arc<Database>,
}

impl SqliteRecipeRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Repository for SqliteRecipeRepository {
    type Entity = Recipe;
    type New = NewRecipe;

    fn get_by_id(&self, id: i64) -> RepoResult<Recipe> {
        self.db.get_recipe(id)
    }

    fn update_field(&self, id: i64, value: &str) -> RepoResult<()> {
        self.db.retitle_recipe(id, value)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        self.db.soft_delete_recipe(id)
    }

    fn create(&self, new: &NewRecipe) -> RepoResult<i64> {
        self.db.insert_recipe(new)
    }
}

impl RecipeRepository for SqliteRecipeRepository {
    fn list(&self, query: &RecipeQuery) -> RepoResult<Vec<Recipe>> {
        self.db.list_recipes(query)
    }
}
