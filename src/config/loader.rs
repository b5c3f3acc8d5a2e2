//! File loading and conversion into validated endpoint definitions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::constants::DEFAULT_CACHE_TTL_SECS;
use crate::endpoint::{internal_routine, Discovery, EndpointDefinition, ProxySettings};

use super::types::{CommonTable, EndpointTable, SettingsFile};
use super::{CommonSettings, Settings};

/// Loads and parses the settings file at `path`.
///
/// If no file exists, writes a commented template first and returns the
/// (empty) parsed result.
pub(super) fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS)
            .with_context(|| format!("Failed to write default settings to {path:?}"))?;
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {path:?}"))?;
    parse_settings(&contents)
}

/// Parses settings file contents.
///
/// A malformed endpoint entry is discarded with a warning; one bad entry
/// never prevents the rest of the configuration from loading. A malformed
/// top-level document is still an error.
pub(super) fn parse_settings(contents: &str) -> Result<Settings> {
    let raw: SettingsFile =
        toml::from_str(contents).context("Failed to parse settings as TOML")?;

    let common = common_settings(&raw.common);
    let mut endpoints = BTreeMap::new();

    for (name, value) in raw.endpoints {
        if name.is_empty() {
            warn!("skipping endpoint entry with empty name");
            continue;
        }
        let table: EndpointTable = match value.try_into() {
            Ok(t) => t,
            Err(e) => {
                warn!("skipping endpoint '{name}': {e}");
                continue;
            }
        };
        endpoints.insert(name.clone(), definition(name, table, &common));
    }

    Ok(Settings { common, endpoints })
}

fn common_settings(table: &CommonTable) -> CommonSettings {
    CommonSettings {
        proxy: ProxySettings {
            http_proxy: non_empty(table.http_proxy.clone()),
            https_proxy: non_empty(table.https_proxy.clone()),
            no_proxy: non_empty(table.no_proxy.clone()),
        },
        cache_ttl_seconds: table.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS),
    }
}

/// Converts a raw endpoint table into a definition, resolving the
/// discovery strategy once. A static list wins over a configured command.
fn definition(name: String, table: EndpointTable, common: &CommonSettings) -> EndpointDefinition {
    let discovery = match (table.list_of_models, non_empty(table.list_models_cmd)) {
        (Some(models), _) => Discovery::Static(models),
        (None, Some(cmd)) => match internal_routine(&cmd) {
            Some(routine) => Discovery::InProcess(routine),
            None => Discovery::External(cmd),
        },
        (None, None) => Discovery::None,
    };

    EndpointDefinition {
        name,
        url: table.endpoint,
        description: table.description,
        supported_clients: table
            .supported_client
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        api_key: non_empty(table.api_key),
        api_key_env: non_empty(table.api_key_env),
        use_proxy: table.use_proxy,
        keep_proxy_config: table.keep_proxy_config,
        discovery,
        cache_ttl_secs: table.cache_ttl_seconds.unwrap_or(common.cache_ttl_seconds),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Template written on first run.
const DEFAULT_SETTINGS: &str = r#"# camgr settings
#
# Shared defaults live under [common]; each endpoint gets its own
# [endpoints.<name>] table.

[common]
# http_proxy = "http://proxy.internal:3128"
# https_proxy = "http://proxy.internal:3128"
# no_proxy = "localhost,127.0.0.1"
# cache_ttl_seconds = 86400

# [endpoints.litellm]
# endpoint = "http://localhost:4000"
# description = "Local LiteLLM gateway"
# api_key_env = "LITELLM_MASTER_KEY"
# supported_client = "claude,codex"
# list_models_cmd = "python3 -m code_assistant_manager.v1_models"
# cache_ttl_seconds = 3600

# [endpoints.pinned]
# endpoint = "https://api.example.com"
# description = "Endpoint with a fixed model list"
# list_of_models = ["gpt-4", "gpt-3.5-turbo"]
"#;
