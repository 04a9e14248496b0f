//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; the transcript owns stdout.
//! Both pass through the terminal gate so nothing is drawn over an open
//! prompt.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::ui::GatedStderr;

/// Level used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Builds the filter, letting `RUST_LOG` override `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("Invalid log level '{level}': {e}"))
}

/// Installs the global subscriber.
pub fn init(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(GatedStderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
