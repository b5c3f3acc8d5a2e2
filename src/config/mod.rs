//! Settings repository for camgr.
//!
//! Endpoint definitions are stored as TOML at the platform's XDG config
//! path (e.g. `~/.config/camgr/settings.toml` on Linux). Parsed results
//! are memoized in-memory for a short window so bursts of lookups don't
//! re-read the file; `reload` forces a fresh parse.

mod loader;
pub mod paths;
mod types;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::constants::SETTINGS_MEMO_TTL_SECS;
use crate::endpoint::{EndpointDefinition, ProxySettings};

/// Parsed, validated settings.
#[derive(Debug, Default)]
pub struct Settings {
    pub common: CommonSettings,
    /// Endpoint definitions keyed (and iterated) by name.
    pub endpoints: BTreeMap<String, EndpointDefinition>,
}

/// The shared `[common]` section after defaulting.
#[derive(Debug, Clone, Default)]
pub struct CommonSettings {
    pub proxy: ProxySettings,
    /// Fallback model cache TTL for endpoints without their own.
    pub cache_ttl_seconds: u64,
}

struct Memo {
    loaded_at: Instant,
    settings: Arc<Settings>,
}

/// Handle to the settings file with short-lived memoization.
pub struct ConfigStore {
    path: PathBuf,
    memo_ttl: Duration,
    memo: Mutex<Option<Memo>>,
}

impl ConfigStore {
    /// Opens the store at the default XDG settings path.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(paths::config_path()?))
    }

    /// Opens the store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            memo_ttl: Duration::from_secs(SETTINGS_MEMO_TTL_SECS),
            memo: Mutex::new(None),
        }
    }

    /// Path of the backing settings file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Returns the parsed settings, re-reading the file only when the
    /// memoized copy has expired.
    pub fn settings(&self) -> Result<Arc<Settings>> {
        {
            let memo = self.memo.lock().unwrap();
            if let Some(ref m) = *memo {
                if m.loaded_at.elapsed() < self.memo_ttl {
                    return Ok(Arc::clone(&m.settings));
                }
            }
        }
        self.reload()
    }

    /// Forces a re-parse of the settings file.
    pub fn reload(&self) -> Result<Arc<Settings>> {
        let settings = Arc::new(loader::load_settings(&self.path)?);
        let mut memo = self.memo.lock().unwrap();
        *memo = Some(Memo {
            loaded_at: Instant::now(),
            settings: Arc::clone(&settings),
        });
        Ok(settings)
    }
}

#[cfg(test)]
mod tests;
