//! Log output setup
//!
//! Diagnostics go to stderr so they never interleave with the shell's
//! stdout. `RUST_LOG` wins over the configured level.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `default_level`
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level '{}'", default_level)),
    }
}

/// Install the global tracing subscriber
pub fn init(default_level: &str) -> Result<()> {
    let filter = env_filter(default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
