//! Platform-specific configuration and paths

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Overrides the position store location
pub const STORE_ENV: &str = "PACKNAV_STORE";

/// Overrides the base directory or URL packs are loaded from
pub const BASE_ENV: &str = "PACKNAV_BASE";

/// Get the position store database path
/// - macOS: ~/Library/Application Support/packnav/positions.db
/// - Linux: ~/.local/share/packnav/positions.db
/// - Windows: %APPDATA%/packnav/positions.db
///
/// `PACKNAV_STORE` takes precedence when set.
pub fn store_path() -> Result<PathBuf> {
    if let Some(path) = env_override(STORE_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data.join("packnav").join("positions.db"))
}

/// Get the base location packs are resolved against
///
/// `PACKNAV_BASE` when set, otherwise the current directory.
pub fn default_base() -> String {
    env_override(BASE_ENV).unwrap_or_else(|| ".".to_string())
}

fn env_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
