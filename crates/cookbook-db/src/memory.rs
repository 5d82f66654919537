//! In-process repositories with the same semantics as the SQLite ones:
//! monotonic IDs, soft delete, `LIKE`-style category filter.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use cookbook_types::models::{NewRecipe, NewUser, Recipe, User};

use crate::error::{RepoError, RepoResult};
use crate::query::RecipeQuery;
use crate::repository::{RecipeRepository, Repository, UserRepository};

struct Row<T> {
    entity: T,
    deleted_at: Option<DateTime<Utc>>,
}

struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, Row<T>>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }

    fn insert(&mut self, build: impl FnOnce(i64) -> T) -> i64 {
        self.last_id += 1;
        let id = self.last_id;
        self.rows.insert(
            id,
            Row {
                entity: build(id),
                deleted_at: None,
            },
        );
        id
    }

    fn live_mut(&mut self, id: i64) -> RepoResult<&mut T> {
        self.rows
            .get_mut(&id)
            .filter(|row| row.deleted_at.is_none())
            .map(|row| &mut row.entity)
            .ok_or(RepoError::NotFound)
    }

    fn get(&self, id: i64) -> RepoResult<T> {
        self.rows
            .get(&id)
            .filter(|row| row.deleted_at.is_none())
            .map(|row| row.entity.clone())
            .ok_or(RepoError::NotFound)
    }

    fn soft_delete(&mut self, id: i64) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.deleted_at.get_or_insert_with(Utc::now);
        }
    }

    fn live(&self) -> impl Iterator<Item = &T> {
        self.rows
            .values()
            .filter(|row| row.deleted_at.is_none())
            .map(|row| &row.entity)
    }
}

fn lock<T>(table: &Mutex<Table<T>>) -> RepoResult<MutexGuard<'_, Table<T>>> {
    table
        .lock()
        .map_err(|e| RepoError::Storage(format!("table lock poisoned: {}", e)))
}

pub struct MemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::new()),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryUserRepository {
    type Entity = User;
    type New = NewUser;

    fn get_by_id(&self, id: i64) -> RepoResult<User> {
        lock(&self.table)?.get(id)
    }

    fn update_field(&self, id: i64, value: &str) -> RepoResult<()> {
        let mut table = lock(&self.table)?;
        let user = table.live_mut(id)?;
        user.username = value.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        lock(&self.table)?.soft_delete(id);
        Ok(())
    }

    fn create(&self, new: &NewUser) -> RepoResult<i64> {
        let now = Utc::now();
        Ok(lock(&self.table)?.insert(|id| User {
            id,
            username: new.username.clone(),
            email: new.email.clone(),
            password: new.password.clone(),
            created_at: now,
            updated_at: now,
        }))
    }
}

impl UserRepository for MemoryUserRepository {
    fn get_all(&self) -> RepoResult<Vec<User>> {
        Ok(lock(&self.table)?.live().cloned().collect())
    }
}

pub struct MemoryRecipeRepository {
    table: Mutex<Table<Recipe>>,
}

impl MemoryRecipeRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::new()),
        }
    }
}

impl Default for MemoryRecipeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryRecipeRepository {
    type Entity = Recipe;
    type New = NewRecipe;

    fn get_by_id(&self, id: i64) -> RepoResult<Recipe> {
        lock(&self.table)?.get(id)
    }

    fn update_field(&self, id: i64, value: &str) -> RepoResult<()> {
        let mut table = lock(&self.table)?;
        let recipe = table.live_mut(id)?;
        recipe.title = value.to_string();
        recipe.updated_at = Utc::now();
        Ok(())
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        lock(&self.table)?.soft_delete(id);
        Ok(())
    }

    fn create(&self, new: &NewRecipe) -> RepoResult<i64> {
        let now = Utc::now();
        Ok(lock(&self.table)?.insert(|id| Recipe {
            id,
            title: new.title.clone(),
            category: new.category.clone(),
            recipe_text: new.recipe_text.clone(),
            publisher_username: new.publisher_username.clone(),
            published_date: new.published_date,
            created_at: now,
            updated_at: now,
        }))
    }
}

impl RecipeRepository for MemoryRecipeRepository {
    fn list(&self, query: &RecipeQuery) -> RepoResult<Vec<Recipe>> {
        let table = lock(&self.table)?;
        let mut hits: Vec<Recipe> = table
            .live()
            .filter(|r| query.matches_category(&r.category))
            .cloned()
            .collect();
        drop(table);

        if let Some(sort) = query.sort {
            hits.sort_by(|a, b| sort.compare(a, b));
        }

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        Ok(hits
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect())
    }
}
