use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};

use cookbook_types::models::{NewRecipe, NewUser, Recipe, User};

use crate::Database;
use crate::error::RepoResult;
use crate::query::RecipeQuery;

const USER_COLUMNS: &str = "id, username, email, password, created_at, updated_at";

const RECIPE_COLUMNS: &str =
    "id, title, category, recipe_text, publisher_username, published_date, created_at, updated_at";

impl Database {
    // -- Users --

    pub fn insert_user(&self, user: &NewUser) -> RepoResult<i64> {
        let now = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![user.username, user.email, user.password, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user(&self, id: i64) -> RepoResult<User> {
        self.with_conn(|conn| query_user(conn, id))
    }

    pub fn rename_user(&self, id: i64, username: &str) -> RepoResult<()> {
        self.with_tx(|tx| {
            let mut user = query_user(tx, id)?;
            user.username = username.to_string();
            user.updated_at = Utc::now();
            tx.execute(
                "UPDATE users SET username = ?1, updated_at = ?2 WHERE id = ?3",
                params![user.username, user.updated_at, user.id],
            )?;
            Ok(())
        })
    }

    /// Stamps `deleted_at`; affects nothing when the row is absent or gone.
    pub fn soft_delete_user(&self, id: i64) -> RepoResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![Utc::now(), id],
            )?;
            Ok(())
        })
    }

    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Recipes --

    pub fn insert_recipe(&self, recipe: &NewRecipe) -> RepoResult<i64> {
        let now = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO recipes
                    (title, category, recipe_text, publisher_username, published_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    recipe.title,
                    recipe.category,
                    recipe.recipe_text,
                    recipe.publisher_username,
                    recipe.published_date,
                    now
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_recipe(&self, id: i64) -> RepoResult<Recipe> {
        self.with_conn(|conn| query_recipe(conn, id))
    }

    pub fn retitle_recipe(&self, id: i64, title: &str) -> RepoResult<()> {
        self.with_tx(|tx| {
            let mut recipe = query_recipe(tx, id)?;
            recipe.title = title.to_string();
            recipe.updated_at = Utc::now();
            tx.execute(
                "UPDATE recipes SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![recipe.title, recipe.updated_at, recipe.id],
            )?;
            Ok(())
        })
    }

    pub fn soft_delete_recipe(&self, id: i64) -> RepoResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE recipes SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![Utc::now(), id],
            )?;
            Ok(())
        })
    }

    pub fn list_recipes(&self, query: &RecipeQuery) -> RepoResult<Vec<Recipe>> {
        let mut sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE deleted_at IS NULL");
        let mut values: Vec<Value> = Vec::new();

        if !query.filter.is_empty() {
            sql.push_str(" AND category LIKE ? ESCAPE '\\'");
            values.push(Value::Text(query.like_pattern()));
        }

        let order = query
            .sort
            .map(|s| s.order_by_sql())
            .unwrap_or_else(|| "id ASC".to_string());
        sql.push_str(&format!(" ORDER BY {order} LIMIT ? OFFSET ?"));
        values.push(Value::Integer(i64::from(query.limit)));
        // An offset past i64::MAX can only ever land beyond the last row.
        values.push(Value::Integer(i64::try_from(query.offset()).unwrap_or(i64::MAX)));

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values), recipe_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, id: i64) -> RepoResult<User> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND deleted_at IS NULL");
    Ok(conn.query_row(&sql, [id], user_from_row)?)
}

fn query_recipe(conn: &Connection, id: i64) -> RepoResult<Recipe> {
    let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1 AND deleted_at IS NULL");
    Ok(conn.query_row(&sql, [id], recipe_from_row)?)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        recipe_text: row.get(3)?,
        publisher_username: row.get(4)?,
        published_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
