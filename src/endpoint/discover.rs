//! Discovery strategy execution.
//!
//! Builds the discovery environment for a resolved connection and runs the
//! in-process or external strategy. External commands are tokenized and
//! executed as an argument vector (never through a shell) with a bounded
//! timeout; a first token that does not resolve on the search path falls
//! back to the legacy literal model string behavior.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tracing::{debug, warn};

use crate::constants::{ENV_API_KEY, ENV_ENDPOINT, INTERNAL_LIST_ROUTINES, PROXY_ENV_VARS};

use super::error::EndpointError;
use super::types::{ListingRoutine, ResolvedConnection};

/// Builds the environment map a discovery run sees.
///
/// Starts from the current process environment, injects the connection's
/// URL and secret, then either applies the connection's proxy settings
/// (`keep_proxy_config`) or strips every proxy variable. The process
/// environment itself is never mutated.
pub fn prepare_environment(
    conn: &ResolvedConnection,
    keep_proxy_config: bool,
) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = std::env::vars().collect();
    env.insert(ENV_ENDPOINT.to_string(), conn.url.to_string());
    env.insert(ENV_API_KEY.to_string(), conn.secret.clone());

    if keep_proxy_config && conn.proxy.is_enabled() {
        for (key, value) in conn.proxy.to_env() {
            env.insert(key, value);
        }
    } else {
        for key in PROXY_ENV_VARS {
            env.remove(*key);
        }
    }

    env
}

/// Recognizes the `<interp> -m <routine>` shape naming a trusted internal
/// listing routine. Returns the routine when the command should run
/// in-process instead of as a subprocess.
pub fn internal_routine(command: &str) -> Option<ListingRoutine> {
    let tokens = shell_words::split(command).ok()?;
    if tokens.len() >= 3
        && tokens[1] == "-m"
        && INTERNAL_LIST_ROUTINES.contains(&tokens[2].as_str())
    {
        return ListingRoutine::from_name(&tokens[2]);
    }
    None
}

/// Runs an external discovery command.
///
/// Returns `Ok(None)` when there is nothing to parse (empty command or a
/// command that produced no output), `Ok(Some(raw))` with the stdout text
/// otherwise. A first token missing from the search path yields the
/// space-joined token list verbatim; some configurations store a literal
/// model string where a command is expected.
pub async fn run_command(
    endpoint_name: &str,
    command: &str,
    env: &HashMap<String, String>,
    working_dir: &Path,
    timeout: Duration,
) -> Result<Option<String>, EndpointError> {
    let tokens = shell_words::split(command).map_err(|e| EndpointError::DiscoveryFailure {
        endpoint: endpoint_name.to_string(),
        message: format!("unparseable discovery command: {e}"),
    })?;

    if tokens.is_empty() {
        return Ok(None);
    }

    if which::which(&tokens[0]).is_err() {
        debug!(
            endpoint = endpoint_name,
            "discovery command not on PATH, treating as literal model list"
        );
        return Ok(Some(tokens.join(" ")));
    }

    let mut cmd = tokio::process::Command::new(&tokens[0]);
    cmd.args(&tokens[1..])
        .env_clear()
        .envs(env)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| EndpointError::DiscoveryFailure {
        endpoint: endpoint_name.to_string(),
        message: format!("failed to spawn '{}': {e}", tokens[0]),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(EndpointError::DiscoveryFailure {
                endpoint: endpoint_name.to_string(),
                message: format!("failed to run '{}': {e}", tokens[0]),
            })
        }
        Err(_) => {
            return Err(EndpointError::DiscoveryTimeout {
                endpoint: endpoint_name.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            endpoint = endpoint_name,
            code = output.status.code().unwrap_or(-1),
            "discovery command failed: {}",
            stderr.trim()
        );
        return Err(EndpointError::DiscoveryFailure {
            endpoint: endpoint_name.to_string(),
            message: format!(
                "command exited with code {}{}",
                output.status.code().unwrap_or(-1),
                if stderr.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", stderr.trim())
                }
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        warn!(endpoint = endpoint_name, "discovery command returned no output");
        return Ok(None);
    }

    Ok(Some(stdout))
}
