use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use cookbook_api::{ApiConfig, RateLimitConfig};

/// Selects the in-memory repositories instead of a database file.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub log_file: PathBuf,
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
    pub rate_limit: RateLimitConfig,
    pub api: ApiConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port: u16 = var("COOKBOOK_PORT", "6060")
            .parse()
            .context("COOKBOOK_PORT must be a port number")?;
        let refill_per_second: f64 = var("COOKBOOK_RATE_PER_SEC", "1")
            .parse()
            .context("COOKBOOK_RATE_PER_SEC must be a number")?;
        if !refill_per_second.is_finite() || refill_per_second < 0.0 {
            bail!("COOKBOOK_RATE_PER_SEC must be a non-negative number");
        }
        let burst: u32 = var("COOKBOOK_RATE_BURST", "3")
            .parse()
            .context("COOKBOOK_RATE_BURST must be a whole number")?;

        let pages_dir = PathBuf::from(var("COOKBOOK_PAGES_DIR", "pages"));
        let api = ApiConfig {
            not_found_as_500: flag(&lookup, "COOKBOOK_NOT_FOUND_AS_500", false)?,
            login_mismatch_unauthorized: flag(&lookup, "COOKBOOK_STRICT_LOGIN", false)?,
            require_all_fields: flag(&lookup, "COOKBOOK_REQUIRE_ALL_FIELDS", true)?,
            not_found_page: Some(pages_dir.join("errors").join("404.html")),
        };

        Ok(Self {
            host: var("COOKBOOK_HOST", "0.0.0.0"),
            port,
            db_path: var("COOKBOOK_DB_PATH", "cookbook.db"),
            log_file: PathBuf::from(var("COOKBOOK_LOG_FILE", "logs.json")),
            pages_dir,
            static_dir: PathBuf::from(var("COOKBOOK_STATIC_DIR", "static")),
            rate_limit: RateLimitConfig {
                refill_per_second,
                burst,
            },
            api,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean, got {raw:?}"),
    }
}
