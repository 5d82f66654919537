use std::sync::Arc;

use tracing::warn;

use cookbook_db::{RecipeRepository, RepoError, UserRepository};

use crate::config::{ApiConfig, RateLimitConfig};
use crate::error::ApiError;
use crate::limiter::RateLimiter;

pub type AppState = Arc<AppStateInner>;

/// Everything a handler needs, built once at startup.
pub struct AppStateInner {
    pub users: Arc<dyn UserRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub limiter: RateLimiter,
    pub config: ApiConfig,
}

impl AppStateInner {
    pub fn new(
        users: Arc<dyn UserRepository>,
        recipes: Arc<dyn RecipeRepository>,
        rate_limit: RateLimitConfig,
        config: ApiConfig,
    ) -> Self {
        Self {
            users,
            recipes,
            limiter: RateLimiter::new(rate_limit),
            config,
        }
    }

    /// Rate-limit gate every handler passes before doing anything else.
    pub fn admit(&self) -> Result<(), ApiError> {
        if self.limiter.try_acquire() {
            Ok(())
        } else {
            warn!("Rate limit exceeded");
            Err(ApiError::RateLimited)
        }
    }

    pub fn repo_error(&self, err: RepoError) -> ApiError {
        ApiError::from_repo(err, &self.config)
    }
}
