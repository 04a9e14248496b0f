//! XDG-style path utilities for the configuration directory.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations so the
//! config file lives in the same place on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the configuration directory for chatline.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/chatline` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/chatline` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join("chatline")),
        _ => {
            let home = dirs::home_dir().context("Failed to determine home directory")?;
            Ok(home.join(".config").join("chatline"))
        }
    }
}
