use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "cookbook=debug,cookbook_api=debug,cookbook_db=info,tower_http=debug";

/// JSON lines appended to `log_file`, or human-readable stderr output when
/// the file cannot be opened.
pub fn init(log_file: &Path) {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .init();
            info!("Logging to {}", log_file.display());
        }
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(filter()).init();
            warn!(
                "Failed to log to file {}, using default stderr: {}",
                log_file.display(),
                e
            );
        }
    }
}
