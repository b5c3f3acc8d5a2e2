//! The cache-or-refresh decision point.
//!
//! This is the only place user interaction touches the engine. The engine
//! works with the collaborator stubbed out: the default implementation
//! always refreshes.

use dialoguer::{theme::ColorfulTheme, Select};

use super::cache::CacheResult;

/// Outcome of the cache-or-refresh decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheChoice {
    /// Reuse the cached model list outright.
    UseCache,
    /// Discard the cache and run discovery again.
    Refresh,
}

/// Collaborator asked whether a valid cache should be reused.
///
/// Only consulted when a valid cache exists. Declining (or any prompt
/// failure) is equivalent to choosing refresh.
pub trait CachePrompt {
    fn prompt_use_cache(&self, endpoint_name: &str, cached: &CacheResult) -> CacheChoice;
}

/// Default stub: never reuse, always refresh.
#[derive(Debug, Default)]
pub struct AlwaysRefresh;

impl CachePrompt for AlwaysRefresh {
    fn prompt_use_cache(&self, _endpoint_name: &str, _cached: &CacheResult) -> CacheChoice {
        CacheChoice::Refresh
    }
}

/// Reuse any valid cache without asking. Used by non-interactive callers
/// that explicitly prefer cached data.
#[derive(Debug, Default)]
pub struct AlwaysUseCache;

impl CachePrompt for AlwaysUseCache {
    fn prompt_use_cache(&self, _endpoint_name: &str, _cached: &CacheResult) -> CacheChoice {
        CacheChoice::UseCache
    }
}

/// Interactive terminal menu.
#[derive(Debug, Default)]
pub struct InteractivePrompt;

impl CachePrompt for InteractivePrompt {
    fn prompt_use_cache(&self, endpoint_name: &str, cached: &CacheResult) -> CacheChoice {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Cached model list for '{}' available ({} models)",
                endpoint_name,
                cached.models.len()
            ))
            .items(&["Use cached model list", "Refresh from server"])
            .default(0)
            .interact_opt();

        match selection {
            Ok(Some(0)) => CacheChoice::UseCache,
            // Cancel, "Refresh", or a broken terminal all mean refresh.
            _ => CacheChoice::Refresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stubs_are_deterministic() {
        let cached = CacheResult {
            is_valid: true,
            models: vec!["m".to_string()],
        };
        assert_eq!(
            AlwaysRefresh.prompt_use_cache("ep", &cached),
            CacheChoice::Refresh
        );
        assert_eq!(
            AlwaysUseCache.prompt_use_cache("ep", &cached),
            CacheChoice::UseCache
        );
    }
}
