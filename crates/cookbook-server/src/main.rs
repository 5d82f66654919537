mod config;
mod logging;
mod pages;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use cookbook_api::{AppState, AppStateInner};
use cookbook_db::{
    Database, MemoryRecipeRepository, MemoryUserRepository, RecipeRepository, SqliteRecipeRepository,
    SqliteUserRepository, UserRepository,
};

use crate::config::{IN_MEMORY_DB, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env()?;
    logging::init(&config.log_file);

    let (users, recipes): (Arc<dyn UserRepository>, Arc<dyn RecipeRepository>) =
        if config.db_path == IN_MEMORY_DB {
            info!("Using in-memory repositories; nothing will be persisted");
            (
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryRecipeRepository::new()),
            )
        } else {
            let db = Database::open(Path::new(&config.db_path))
                .context("Error connecting to database")?;
            let db = Arc::new(db);
            (
                Arc::new(SqliteUserRepository::new(db.clone())),
                Arc::new(SqliteRecipeRepository::new(db)),
            )
        };

    let state: AppState = Arc::new(AppStateInner::new(
        users,
        recipes,
        config.rate_limit,
        config.api.clone(),
    ));

    let app = Router::new()
        .merge(pages::routes(&config.pages_dir, &config.static_dir))
        .merge(cookbook_api::router(state))
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Cookbook server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
