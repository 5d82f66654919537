pub mod auth;
pub mod blocking;
pub mod config;
pub mod error;
pub mod extract;
pub mod limiter;
pub mod recipes;
pub mod router;
pub mod state;
pub mod users;

pub use config::{ApiConfig, RateLimitConfig};
pub use error::ApiError;
pub use limiter::RateLimiter;
pub use router::router;
pub use state::{AppState, AppStateInner};
