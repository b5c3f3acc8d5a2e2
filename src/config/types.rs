//! Struct definitions and serde defaults for the settings file.
//!
//! These are the raw deserialization targets; the loader converts them
//! into validated [`EndpointDefinition`](crate::endpoint::EndpointDefinition)
//! values.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw shape of `settings.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    /// Shared defaults: proxy servers and the fallback cache TTL.
    #[serde(default)]
    pub common: CommonTable,
    /// Endpoint tables keyed by endpoint name.
    #[serde(default)]
    pub endpoints: BTreeMap<String, toml::Value>,
}

/// The `[common]` section.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CommonTable {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
    /// Fallback model cache TTL for endpoints that don't set their own.
    pub cache_ttl_seconds: Option<u64>,
}

/// A single `[endpoints.<name>]` table.
///
/// Only `endpoint` is required; everything else defaults. Entries that
/// fail to deserialize are discarded by the loader with a warning, never
/// failing the whole file.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointTable {
    /// Base URL of the chat-completion backend.
    pub endpoint: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated client identifiers this endpoint is limited to.
    #[serde(default)]
    pub supported_client: String,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub use_proxy: bool,
    #[serde(default)]
    pub keep_proxy_config: bool,
    pub list_models_cmd: Option<String>,
    pub list_of_models: Option<Vec<String>>,
    pub cache_ttl_seconds: Option<u64>,
}
