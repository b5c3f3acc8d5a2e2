//! Core data model for endpoints and resolved connections.

use std::collections::HashMap;

use url::Url;

/// How an endpoint's model list is discovered.
///
/// Resolved once at config-load time so call sites dispatch on a tagged
/// variant instead of re-inspecting command strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// No discovery configured; the endpoint exposes zero discoverable
    /// models and relies on caller-supplied model names.
    None,
    /// Fixed, config-declared model list. Bypasses live discovery entirely.
    /// Wins over a configured command when both are present.
    Static(Vec<String>),
    /// One of the trusted internal listing routines, run in-process.
    InProcess(ListingRoutine),
    /// External command, tokenized and executed as a child process.
    External(String),
}

/// Trusted internal listing routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingRoutine {
    /// Unified `/v1/models` fetcher for OpenAI-compatible servers.
    V1Models,
}

impl ListingRoutine {
    /// Maps an internal routine name from a discovery command to a variant.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "code_assistant_manager.v1_models" => Some(Self::V1Models),
            _ => None,
        }
    }
}

/// A named endpoint definition, immutable per load cycle.
#[derive(Debug, Clone)]
pub struct EndpointDefinition {
    /// Unique, non-empty endpoint name (the `[endpoints.<name>]` key).
    pub name: String,
    /// Base URL of the chat-completion backend.
    pub url: String,
    /// Human-readable description shown in listings.
    pub description: String,
    /// Client identifiers this endpoint is restricted to. Empty = all.
    pub supported_clients: Vec<String>,
    /// Plaintext secret from the config file (least-trusted source).
    pub api_key: Option<String>,
    /// Name of an environment variable holding the secret.
    pub api_key_env: Option<String>,
    /// Whether the common proxy settings apply to this endpoint.
    pub use_proxy: bool,
    /// Whether discovery subprocesses keep the proxy environment.
    pub keep_proxy_config: bool,
    /// Model discovery strategy, resolved at load time.
    pub discovery: Discovery,
    /// Model cache TTL in seconds.
    pub cache_ttl_secs: u64,
}

impl EndpointDefinition {
    /// Whether this endpoint is usable from the given client.
    ///
    /// An endpoint with no `supported_client` restriction accepts every
    /// client, and an empty client name matches everything.
    pub fn supports_client(&self, client_name: &str) -> bool {
        if self.supported_clients.is_empty() || client_name.is_empty() {
            return true;
        }
        self.supported_clients.iter().any(|c| c == client_name)
    }
}

/// Proxy settings from the `[common]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

impl ProxySettings {
    /// Whether any proxy is actually configured.
    pub fn is_enabled(&self) -> bool {
        self.http_proxy.is_some() || self.https_proxy.is_some()
    }

    /// Environment-variable form, skipping unset fields.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        if let Some(ref v) = self.http_proxy {
            env.insert("http_proxy".to_string(), v.clone());
        }
        if let Some(ref v) = self.https_proxy {
            env.insert("https_proxy".to_string(), v.clone());
        }
        if let Some(ref v) = self.no_proxy {
            env.insert("no_proxy".to_string(), v.clone());
        }
        env
    }
}

/// A validated, ready-to-use connection descriptor.
///
/// Transient: lives for one `EndpointManager` setup call and is never
/// persisted. Only the discovered model list is ever cached.
#[derive(Debug, Clone)]
pub struct ResolvedConnection {
    /// Endpoint name this connection was resolved for.
    pub endpoint: String,
    /// Validated absolute http/https URL.
    pub url: Url,
    /// Resolved secret. Empty means the endpoint is unauthenticated.
    pub secret: String,
    /// Proxy settings to inject into discovery, when `use_proxy` is set.
    pub proxy: ProxySettings,
    /// Effective model cache TTL in seconds.
    pub cache_ttl_secs: u64,
}
