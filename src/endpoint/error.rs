//! Error taxonomy for endpoint setup and model discovery.
//!
//! Configuration problems are fatal to the current operation and carry
//! actionable suggestions. Discovery problems are recoverable: the manager
//! falls back to a valid cache before surfacing them.

use thiserror::Error;

/// Errors produced by the endpoint engine.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Malformed endpoint definition or failed URL/secret validation.
    /// Aborts the operation; never retried automatically.
    #[error("endpoint '{endpoint}': {message}")]
    Configuration {
        endpoint: String,
        message: String,
        suggestions: Vec<String>,
    },

    /// The discovery subprocess exceeded its timeout.
    #[error("endpoint '{endpoint}': model discovery timed out after {timeout_secs}s")]
    DiscoveryTimeout { endpoint: String, timeout_secs: u64 },

    /// Discovery failed short of a timeout: non-zero exit, transport
    /// error in the in-process routine, or an unusable command string.
    #[error("endpoint '{endpoint}': model discovery failed: {message}")]
    DiscoveryFailure { endpoint: String, message: String },
}

impl EndpointError {
    /// Convenience constructor for configuration errors.
    pub fn configuration(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        suggestions: &[&str],
    ) -> Self {
        Self::Configuration {
            endpoint: endpoint.into(),
            message: message.into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Name of the endpoint the error relates to.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Configuration { endpoint, .. }
            | Self::DiscoveryTimeout { endpoint, .. }
            | Self::DiscoveryFailure { endpoint, .. } => endpoint,
        }
    }

    /// Structured multi-line message: the failure itself plus, for
    /// configuration errors, concrete remediation steps.
    pub fn detailed_message(&self) -> String {
        let mut out = self.to_string();
        match self {
            Self::Configuration { suggestions, .. } if !suggestions.is_empty() => {
                out.push_str("\nSuggestions:");
                for s in suggestions {
                    out.push_str("\n  - ");
                    out.push_str(s);
                }
            }
            Self::DiscoveryTimeout { .. } => {
                out.push_str("\nSuggestions:");
                for s in [
                    "Check network connectivity",
                    "Verify the endpoint is responsive",
                    "Check if the endpoint requires authentication",
                ] {
                    out.push_str("\n  - ");
                    out.push_str(s);
                }
            }
            _ => {}
        }
        out
    }
}
