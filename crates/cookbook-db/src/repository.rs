//! Storage-agnostic contracts the HTTP handlers program against.
//!
//! Every method is synchronous; async callers run them on the blocking pool.

use cookbook_types::models::{NewRecipe, NewUser, Recipe, User};

use crate::error::RepoResult;
use crate::query::RecipeQuery;

/// CRUD over one entity type. IDs are always assigned by storage.
pub trait Repository: Send + Sync {
    type Entity;
    type New;

    /// Fails with `NotFound` when no live row has `id`.
    fn get_by_id(&self, id: i64) -> RepoResult<Self::Entity>;

    /// Loads the row, overwrites its one mutable field and saves it.
    fn update_field(&self, id: i64, value: &str) -> RepoResult<()>;

    /// Succeeds whether or not a live row existed.
    fn delete(&self, id: i64) -> RepoResult<()>;

    /// Inserts a row and returns its storage-assigned ID.
    fn create(&self, new: &Self::New) -> RepoResult<i64>;
}

/// Users; the mutable field is `username`.
pub trait UserRepository: Repository<Entity = User, New = NewUser> {
    /// All live users in ID order.
    fn get_all(&self) -> RepoResult<Vec<User>>;
}

/// Recipes; the mutable field is `title`.
pub trait RecipeRepository: Repository<Entity = Recipe, New = NewRecipe> {
    fn list(&self, query: &RecipeQuery) -> RepoResult<Vec<Recipe>>;
}
