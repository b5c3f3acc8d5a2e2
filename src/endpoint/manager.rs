//! Endpoint orchestration: connection setup and model fetching.
//!
//! `EndpointManager` ties the settings repository, secret resolution,
//! validation, discovery, parsing, and the model cache together behind two
//! operations: `get_endpoint_config` and `fetch_models`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::{paths, ConfigStore};
use crate::constants::DISCOVERY_TIMEOUT_SECS;

use super::cache::ModelCache;
use super::discover;
use super::error::EndpointError;
use super::listing;
use super::parser::parse_models_output;
use super::prompt::{AlwaysRefresh, CacheChoice, CachePrompt};
use super::secret::resolve_secret;
use super::types::{Discovery, EndpointDefinition, ProxySettings, ResolvedConnection};
use super::validate::{validate_model_id, validate_secret, validate_url};

/// Where a fetched model list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    /// User chose to reuse a valid cache.
    Cache,
    /// Config-declared static list.
    Static,
    /// Live discovery (in-process routine or external command).
    Discovered,
    /// No discovery configured; the endpoint relies on caller-supplied
    /// model names.
    NoDiscovery,
    /// Discovery failed but a valid cache record stood in.
    CacheFallback { reason: String },
}

/// A fetched model list plus its provenance.
#[derive(Debug, Clone)]
pub struct FetchedModels {
    pub models: Vec<String>,
    pub source: FetchSource,
}

/// Manages endpoint connections and model discovery.
pub struct EndpointManager {
    config: ConfigStore,
    cache: ModelCache,
    prompter: Box<dyn CachePrompt>,
    working_dir: PathBuf,
    discovery_timeout: Duration,
}

impl EndpointManager {
    /// Creates a manager over the given settings store, with the default
    /// cache directory and a non-interactive (always refresh) prompter.
    pub fn new(config: ConfigStore) -> Result<Self> {
        let cache_dir = paths::cache_dir()?;
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {cache_dir:?}"))?;
        Ok(Self {
            config,
            cache: ModelCache::new(cache_dir),
            prompter: Box::new(AlwaysRefresh),
            working_dir: std::env::current_dir().context("Failed to resolve working directory")?,
            discovery_timeout: Duration::from_secs(DISCOVERY_TIMEOUT_SECS),
        })
    }

    /// Replaces the cache-or-refresh collaborator.
    pub fn with_prompter(mut self, prompter: Box<dyn CachePrompt>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Overrides the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache = ModelCache::new(dir);
        self
    }

    /// Overrides the external-command timeout.
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// The model cache (for `cache clear` style operations).
    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Endpoint definitions visible to the given client, in name order.
    pub fn list_endpoints(&self, client: Option<&str>) -> Result<Vec<EndpointDefinition>> {
        let settings = self.config.settings()?;
        Ok(settings
            .endpoints
            .values()
            .filter(|def| client.map_or(true, |c| def.supports_client(c)))
            .cloned()
            .collect())
    }

    /// Assembles and validates the connection descriptor for an endpoint.
    ///
    /// Fails closed: an unknown endpoint, an invalid URL, or a malformed
    /// secret each abort with a configuration error carrying remediation
    /// suggestions.
    pub fn get_endpoint_config(
        &self,
        endpoint_name: &str,
    ) -> Result<(EndpointDefinition, ResolvedConnection), EndpointError> {
        let settings = self.config.settings().map_err(|e| {
            EndpointError::configuration(
                endpoint_name,
                format!("failed to load settings: {e:#}"),
                &["Check that the settings file exists and parses as TOML"],
            )
        })?;

        let def = settings.endpoints.get(endpoint_name).ok_or_else(|| {
            EndpointError::configuration(
                endpoint_name,
                "not found in configuration",
                &[
                    "Check the endpoint name for typos",
                    "Run 'camgr endpoints' to list configured endpoints",
                ],
            )
        })?;

        let url = validate_url(&def.url).map_err(|reason| {
            EndpointError::configuration(
                endpoint_name,
                format!("Endpoint URL failed validation: {reason}"),
                &[
                    "Check that the endpoint URL is properly formatted",
                    "Ensure the URL starts with http:// or https://",
                    "Verify the endpoint is accessible",
                ],
            )
        })?;

        let secret = resolve_secret(endpoint_name, def);
        if !secret.is_empty() && !validate_secret(&secret) {
            return Err(EndpointError::configuration(
                endpoint_name,
                "API key failed validation",
                &[
                    "Check that the API key is properly formatted",
                    "Verify the API key is valid and not expired",
                    "Ensure the API key has the required permissions",
                ],
            ));
        }

        let proxy = if def.use_proxy {
            settings.common.proxy.clone()
        } else {
            ProxySettings::default()
        };

        let conn = ResolvedConnection {
            endpoint: endpoint_name.to_string(),
            url,
            secret,
            proxy,
            cache_ttl_secs: def.cache_ttl_secs,
        };
        Ok((def.clone(), conn))
    }

    /// Fetches the model list for an endpoint.
    ///
    /// Order of precedence: a valid cache the user chooses to reuse, the
    /// static config-declared list, nothing (no discovery configured), or
    /// live discovery. Discovery failures fall back to a valid cache
    /// record before surfacing.
    pub async fn fetch_models(
        &self,
        def: &EndpointDefinition,
        conn: &ResolvedConnection,
        use_cache_if_available: bool,
    ) -> Result<FetchedModels, EndpointError> {
        if use_cache_if_available {
            let cached = self.cache.read(&def.name, def.cache_ttl_secs);
            if cached.is_valid
                && self.prompter.prompt_use_cache(&def.name, &cached) == CacheChoice::UseCache
            {
                debug!(endpoint = %def.name, "reusing cached model list");
                return Ok(FetchedModels {
                    models: cached.models,
                    source: FetchSource::Cache,
                });
            }
        }

        match &def.discovery {
            Discovery::Static(list) => {
                let models: Vec<String> = list
                    .iter()
                    .filter(|m| validate_model_id(m))
                    .cloned()
                    .collect();
                info!(endpoint = %def.name, count = models.len(), "using static model list");
                self.store(&def.name, &models);
                Ok(FetchedModels {
                    models,
                    source: FetchSource::Static,
                })
            }
            Discovery::None => Ok(FetchedModels {
                models: Vec::new(),
                source: FetchSource::NoDiscovery,
            }),
            Discovery::InProcess(routine) => {
                let env = discover::prepare_environment(conn, def.keep_proxy_config);
                match listing::run(*routine, &def.name, &env).await {
                    Ok(raw) => Ok(self.finish_discovery(def, &raw)),
                    Err(err) => self.fallback_to_cache(def, err),
                }
            }
            Discovery::External(command) => {
                let env = discover::prepare_environment(conn, def.keep_proxy_config);
                let result = discover::run_command(
                    &def.name,
                    command,
                    &env,
                    &self.working_dir,
                    self.discovery_timeout,
                )
                .await;
                match result {
                    Ok(Some(raw)) => Ok(self.finish_discovery(def, &raw)),
                    Ok(None) => Ok(FetchedModels {
                        models: Vec::new(),
                        source: FetchSource::Discovered,
                    }),
                    Err(err) => self.fallback_to_cache(def, err),
                }
            }
        }
    }

    /// Parses a successful discovery output and records it in the cache.
    fn finish_discovery(&self, def: &EndpointDefinition, raw: &str) -> FetchedModels {
        let models = parse_models_output(raw);
        self.store(&def.name, &models);
        FetchedModels {
            models,
            source: FetchSource::Discovered,
        }
    }

    /// Cache writes must never fail a successful discovery.
    fn store(&self, endpoint_name: &str, models: &[String]) {
        if let Err(e) = self.cache.write(endpoint_name, models) {
            warn!(endpoint = endpoint_name, "failed to write model cache: {e:#}");
        }
    }

    /// After a discovery error, serves a still-valid cache record instead
    /// of failing; escalates the original error when no usable record
    /// exists.
    fn fallback_to_cache(
        &self,
        def: &EndpointDefinition,
        err: EndpointError,
    ) -> Result<FetchedModels, EndpointError> {
        let reason = match err {
            EndpointError::DiscoveryTimeout { .. } => "timeout",
            _ => "error",
        };
        warn!("{}", err.detailed_message());

        let cached = self.cache.read(&def.name, def.cache_ttl_secs);
        if cached.is_valid {
            info!(endpoint = %def.name, "using cached model list due to {reason}");
            return Ok(FetchedModels {
                models: cached.models,
                source: FetchSource::CacheFallback {
                    reason: reason.to_string(),
                },
            });
        }
        Err(err)
    }
}
