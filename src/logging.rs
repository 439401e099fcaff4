//! Tracing setup. Logs go to a file, the terminal belongs to the table.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::domain::TVError;

/// Used when RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "rtv=info,warn";

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("rtv.log")
}

pub fn init(log_file: &Path) -> Result<(), TVError> {
    let file = File::create(log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TVError::LoggingFailed(e.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rtv starting up");
    tracing::debug!(log_file = %log_file.display(), "Log file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_file_is_in_temp_dir() {
        let path = default_log_file();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("rtv.log"));
    }
}
