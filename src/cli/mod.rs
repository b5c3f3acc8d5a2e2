//! Command-line interface definition and dispatch for camgr.
//!
//! Uses [`clap`] for argument parsing with derive macros. The CLI is thin
//! command dispatch: all endpoint and cache behavior lives in
//! [`crate::endpoint`].

use std::io::IsTerminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{paths, ConfigStore};
use crate::endpoint::{
    AlwaysRefresh, AlwaysUseCache, CachePrompt, EndpointManager, FetchSource, InteractivePrompt,
    ModelCache,
};

/// Top-level CLI structure for camgr.
///
/// Parsed from command-line arguments via [`clap::Parser`]. Contains a single
/// required subcommand that determines which action camgr performs.
#[derive(Parser)]
#[command(name = "camgr", about = "Point AI coding assistants at custom endpoints")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the camgr CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// List configured endpoints
    Endpoints {
        /// Only show endpoints supporting this client
        #[arg(long)]
        client: Option<String>,
    },
    /// Fetch the model list for an endpoint
    Models {
        /// Endpoint name from settings.toml
        endpoint: String,
        /// Skip the cache and force a fresh discovery
        #[arg(long)]
        refresh: bool,
        /// Reuse any valid cache without prompting
        #[arg(long, conflicts_with = "refresh")]
        cached: bool,
    },
    /// Manage the model list cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `cache` command.
#[derive(Subcommand)]
pub enum CacheAction {
    /// Remove cached model lists (all endpoints unless one is named)
    Clear { endpoint: Option<String> },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the settings file
    Show,
    /// Print the settings file path
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Endpoints { client } => list_endpoints(client.as_deref()),
        Commands::Models {
            endpoint,
            refresh,
            cached,
        } => fetch_models(&endpoint, refresh, cached).await,
        Commands::Cache { action } => match action {
            CacheAction::Clear { endpoint } => clear_cache(endpoint.as_deref()),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let path = paths::config_path()?;
                println!("{} {}", "Settings path:".bold(), path.display());
                println!();
                if path.exists() {
                    print!("{}", std::fs::read_to_string(&path)?);
                } else {
                    println!("(no settings file yet -- it is created on first use)");
                }
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", paths::config_path()?.display());
                Ok(())
            }
        },
    }
}

fn list_endpoints(client: Option<&str>) -> Result<()> {
    let manager = EndpointManager::new(ConfigStore::open_default()?)?;
    let endpoints = manager.list_endpoints(client)?;

    if endpoints.is_empty() {
        match client {
            Some(c) => anyhow::bail!("No endpoints configured for client '{c}' in settings.toml"),
            None => anyhow::bail!("No endpoints configured in settings.toml"),
        }
    }

    for def in endpoints {
        let desc = if def.description.is_empty() {
            def.url.clone()
        } else {
            def.description.clone()
        };
        println!("{} -> {} -> {}", def.name.bold().cyan(), def.url, desc.dimmed());
    }
    Ok(())
}

async fn fetch_models(endpoint: &str, refresh: bool, cached: bool) -> Result<()> {
    let prompter: Box<dyn CachePrompt> = if cached {
        Box::new(AlwaysUseCache)
    } else if std::io::stdin().is_terminal() {
        Box::new(InteractivePrompt)
    } else {
        Box::new(AlwaysRefresh)
    };

    let manager = EndpointManager::new(ConfigStore::open_default()?)?.with_prompter(prompter);

    let (def, conn) = manager
        .get_endpoint_config(endpoint)
        .map_err(|e| anyhow::anyhow!("{}", e.detailed_message()))?;

    let desc = if def.description.is_empty() {
        def.url.clone()
    } else {
        def.description.clone()
    };
    eprintln!(
        "Using endpoint '{}' ({}) -> {}",
        endpoint.bold().cyan(),
        desc,
        def.url
    );

    let fetched = manager
        .fetch_models(&def, &conn, !refresh)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.detailed_message()))?;

    match &fetched.source {
        FetchSource::Cache => eprintln!("{}", "(cached model list)".dimmed()),
        FetchSource::Static => eprintln!(
            "{}",
            format!("(static model list, {} models)", fetched.models.len()).dimmed()
        ),
        FetchSource::CacheFallback { reason } => eprintln!(
            "{}",
            format!("(used cached model list due to {reason})").yellow()
        ),
        FetchSource::NoDiscovery => eprintln!(
            "{}",
            "(no model discovery configured for this endpoint)".dimmed()
        ),
        FetchSource::Discovered => {}
    }

    for model in &fetched.models {
        println!("{model}");
    }
    Ok(())
}

fn clear_cache(endpoint: Option<&str>) -> Result<()> {
    let cache = ModelCache::new(paths::cache_dir()?);
    match endpoint {
        Some(name) => {
            if cache.clear(name)? {
                println!("Cleared cached model list for '{name}'");
            } else {
                println!("No cached model list for '{name}'");
            }
        }
        None => {
            let removed = cache.clear_all()?;
            println!("Cleared {removed} cached model list(s)");
        }
    }
    Ok(())
}
