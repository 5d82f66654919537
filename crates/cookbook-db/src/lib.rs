pub mod error;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod query;
pub mod repository;
pub mod sqlite;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use error::{RepoError, RepoResult};
pub use memory::{MemoryRecipeRepository, MemoryUserRepository};
pub use query::{RecipeColumn, RecipeQuery, RecipeSort, DEFAULT_PAGE_SIZE};
pub use repository::{RecipeRepository, Repository, UserRepository};
pub use sqlite::{SqliteRecipeRepository, SqliteUserRepository};

/// Single SQLite connection shared by both repositories.
///
/// SQLite serializes writers anyway, so one connection behind a mutex is
/// enough; callers run queries from `spawn_blocking`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private, non-persistent database. Used by tests and by
    /// `COOKBOOK_DB_PATH=:memory:`.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&Connection) -> RepoResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepoError::Storage(format!("DB lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Runs `f` inside a transaction, committed only when `f` succeeds.
    pub fn with_tx<F, T>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> RepoResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepoError::Storage(format!("DB lock poisoned: {}", e)))?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
