//! Secret resolution for endpoints.
//!
//! Pure read of the process environment and the endpoint definition;
//! absence resolves to an empty string, never an error.

use std::env;

use crate::constants::{GENERIC_API_KEY_VAR, LEGACY_API_KEY_ALIASES};

use super::types::EndpointDefinition;

/// Resolves the effective secret for an endpoint.
///
/// Precedence, first non-empty match wins:
/// 1. the environment variable named by the endpoint's `api_key_env`
/// 2. the synthesized `API_KEY_<NAME>` variable (uppercased, `-` → `_`)
/// 3. legacy aliases for two well-known endpoint names
/// 4. the generic `API_KEY` variable
/// 5. the plaintext `api_key` from the config file
pub fn resolve_secret(endpoint_name: &str, definition: &EndpointDefinition) -> String {
    if let Some(ref var) = definition.api_key_env {
        if let Some(val) = non_empty_var(var) {
            return val;
        }
    }

    let synthesized = format!(
        "API_KEY_{}",
        endpoint_name.to_uppercase().replace('-', "_")
    );
    if let Some(val) = non_empty_var(&synthesized) {
        return val;
    }

    for (name, alias) in LEGACY_API_KEY_ALIASES {
        if endpoint_name == *name {
            if let Some(val) = non_empty_var(alias) {
                return val;
            }
        }
    }

    if let Some(val) = non_empty_var(GENERIC_API_KEY_VAR) {
        return val;
    }

    definition.api_key.clone().unwrap_or_default()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::types::Discovery;

    fn definition(name: &str, api_key: Option<&str>, api_key_env: Option<&str>) -> EndpointDefinition {
        EndpointDefinition {
            name: name.to_string(),
            url: "https://example.com".to_string(),
            description: String::new(),
            supported_clients: Vec::new(),
            api_key: api_key.map(str::to_string),
            api_key_env: api_key_env.map(str::to_string),
            use_proxy: false,
            keep_proxy_config: false,
            discovery: Discovery::None,
            cache_ttl_secs: 86_400,
        }
    }

    #[test]
    fn declared_env_var_wins_over_everything() {
        // Unique names so parallel tests don't collide on process env.
        env::set_var("CAMGR_TEST_DECLARED", "from-declared");
        env::set_var("API_KEY_PREC_ONE", "from-synthesized");
        let def = definition("prec-one", Some("from-config"), Some("CAMGR_TEST_DECLARED"));
        assert_eq!(resolve_secret("prec-one", &def), "from-declared");
        env::remove_var("CAMGR_TEST_DECLARED");
        assert_eq!(resolve_secret("prec-one", &def), "from-synthesized");
        env::remove_var("API_KEY_PREC_ONE");
    }

    #[test]
    fn synthesized_var_uppercases_and_replaces_dashes() {
        env::set_var("API_KEY_MY_LOCAL_EP", "dyn-value");
        let def = definition("my-local-ep", None, None);
        assert_eq!(resolve_secret("my-local-ep", &def), "dyn-value");
        env::remove_var("API_KEY_MY_LOCAL_EP");
    }

    #[test]
    fn legacy_alias_applies_to_known_names_only() {
        env::set_var("API_KEY_COPILOT", "legacy-value");
        let copilot = definition("copilot-api", None, None);
        assert_eq!(resolve_secret("copilot-api", &copilot), "legacy-value");
        // Another endpoint never reads the alias.
        let other = definition("prec-other", Some("cfg"), None);
        assert_eq!(resolve_secret("prec-other", &other), "cfg");
        env::remove_var("API_KEY_COPILOT");
    }

    #[test]
    fn config_value_is_last_and_absence_is_empty() {
        let with_key = definition("prec-cfg", Some("cfg-secret"), None);
        assert_eq!(resolve_secret("prec-cfg", &with_key), "cfg-secret");
        let without = definition("prec-none", None, None);
        assert_eq!(resolve_secret("prec-none", &without), "");
    }

    #[test]
    fn empty_env_values_are_skipped() {
        env::set_var("CAMGR_TEST_EMPTY", "");
        let def = definition("prec-empty", Some("cfg"), Some("CAMGR_TEST_EMPTY"));
        assert_eq!(resolve_secret("prec-empty", &def), "cfg");
        env::remove_var("CAMGR_TEST_EMPTY");
    }
}
