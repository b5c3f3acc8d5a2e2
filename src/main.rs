//! Entry point for camgr, a terminal manager that points AI coding
//! assistants at custom chat-completion endpoints.
//!
//! This binary loads environment variables, parses CLI arguments via
//! [`cli`], and dispatches to the appropriate subcommand handler.

mod cli;
mod config;
mod constants;
mod endpoint;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the camgr CLI.
///
/// Loads `.env` files (silently ignored if absent), initializes stderr
/// diagnostics, parses command-line arguments, and dispatches the chosen
/// subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = cli::parse();
    cli::run(cli).await
}
