//! In-process `/v1/models` listing routine.
//!
//! Queries an OpenAI-compatible server for its model list and returns the
//! raw response body for the output parser. The connection details arrive
//! through an explicit environment map (`endpoint` / `api_key` keys), the
//! same contract an external discovery command sees. The process
//! environment is never touched.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use crate::constants::{ENV_API_KEY, ENV_ENDPOINT, LISTING_HTTP_TIMEOUT_SECS};

use super::error::EndpointError;
use super::types::ListingRoutine;

/// Runs an internal listing routine against the given environment map.
pub async fn run(
    routine: ListingRoutine,
    endpoint_name: &str,
    env: &HashMap<String, String>,
) -> Result<String, EndpointError> {
    match routine {
        ListingRoutine::V1Models => v1_models(endpoint_name, env).await,
    }
}

/// Fetches `<endpoint>/v1/models` and returns the raw JSON body.
async fn v1_models(
    endpoint_name: &str,
    env: &HashMap<String, String>,
) -> Result<String, EndpointError> {
    let endpoint = env
        .get(ENV_ENDPOINT)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EndpointError::DiscoveryFailure {
            endpoint: endpoint_name.to_string(),
            message: "listing routine requires the endpoint environment variable".to_string(),
        })?;

    let url = models_url(endpoint);
    let client = build_client(endpoint_name, &url)?;

    let mut request = client.get(&url).query(&[
        // LiteLLM accepts these filters; other servers ignore unknown params.
        ("return_wildcard_routes", "false"),
        ("include_model_access_groups", "false"),
        ("only_model_access_groups", "false"),
        ("include_metadata", "false"),
    ]);

    if let Some(key) = env.get(ENV_API_KEY).filter(|v| !v.is_empty()) {
        request = request
            .bearer_auth(key)
            // LiteLLM backward compatibility.
            .header("x-litellm-api-key", key.as_str());
    }

    let response = request
        .header("accept", "application/json")
        .send()
        .await
        .map_err(|e| EndpointError::DiscoveryFailure {
            endpoint: endpoint_name.to_string(),
            message: format!("request to {url} failed: {e}"),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(EndpointError::DiscoveryFailure {
            endpoint: endpoint_name.to_string(),
            message: format!("{url} returned HTTP {status}"),
        });
    }

    response
        .text()
        .await
        .map_err(|e| EndpointError::DiscoveryFailure {
            endpoint: endpoint_name.to_string(),
            message: format!("failed to read response body: {e}"),
        })
}

/// Shapes an endpoint base URL into its `/v1/models` listing URL.
fn models_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/v1/models") {
        trimmed.to_string()
    } else if trimmed.ends_with("/v1") {
        format!("{trimmed}/models")
    } else {
        format!("{trimmed}/v1/models")
    }
}

/// Builds the HTTP client, relaxing certificate verification only for
/// private and loopback addresses (self-hosted gateways with self-signed
/// certs).
fn build_client(endpoint_name: &str, url: &str) -> Result<reqwest::Client, EndpointError> {
    let mut builder =
        reqwest::Client::builder().timeout(Duration::from_secs(LISTING_HTTP_TIMEOUT_SECS));

    if is_private_host(url) {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(|e| EndpointError::DiscoveryFailure {
        endpoint: endpoint_name.to_string(),
        message: format!("failed to build HTTP client: {e}"),
    })
}

fn is_private_host(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_url_shaping() {
        assert_eq!(
            models_url("https://api.example.com/v1/models"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            models_url("https://api.example.com/v1"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            models_url("https://api.example.com"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            models_url("https://api.example.com/"),
            "https://api.example.com/v1/models"
        );
    }

    #[test]
    fn private_host_detection() {
        assert!(is_private_host("https://127.0.0.1:4000"));
        assert!(is_private_host("https://192.168.1.10"));
        assert!(is_private_host("https://10.0.0.5:8080"));
        assert!(!is_private_host("https://api.example.com"));
        assert!(!is_private_host("https://8.8.8.8"));
    }

    #[tokio::test]
    async fn missing_endpoint_var_is_a_failure() {
        let env = HashMap::new();
        let err = run(ListingRoutine::V1Models, "ep", &env).await.unwrap_err();
        assert!(matches!(err, EndpointError::DiscoveryFailure { .. }));
    }
}
