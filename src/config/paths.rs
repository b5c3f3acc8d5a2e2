//! XDG path resolution for the settings file and the model cache.

use std::path::PathBuf;

use anyhow::Result;

use crate::constants::{APP_NAME, CACHE_DIR_NAME, CONFIG_FILENAME};

/// Returns the platform-specific configuration directory.
///
/// `~/.config/camgr/` on Linux (`XDG_CONFIG_HOME/camgr`).
///
/// # Errors
///
/// Returns an error if the platform's config directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(APP_NAME);
    Ok(dir)
}

/// Returns the full path to the settings file.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Returns the model cache directory.
///
/// Rooted at `$XDG_CACHE_HOME` (falling back to `~/.cache`), then the
/// shared `code-assistant-manager` directory other front-ends read too.
pub fn cache_dir() -> Result<PathBuf> {
    let root = match std::env::var("XDG_CACHE_HOME") {
        Ok(v) if !v.is_empty() => PathBuf::from(v),
        _ => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".cache"),
    };
    Ok(root.join(CACHE_DIR_NAME))
}
