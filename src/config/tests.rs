use std::fs;

use super::loader::parse_settings;
use super::ConfigStore;
use crate::endpoint::{Discovery, ListingRoutine};

const SAMPLE: &str = r#"
[common]
http_proxy = "http://proxy:3128"
cache_ttl_seconds = 7200

[endpoints.gateway]
endpoint = "https://gw.example.com"
description = "Team gateway"
api_key_env = "GW_KEY"
supported_client = "claude, codex"
use_proxy = true
list_models_cmd = "curl -s https://gw.example.com/v1/models"

[endpoints.pinned]
endpoint = "https://pin.example.com"
list_of_models = ["a", "b"]
list_models_cmd = "never-run"
cache_ttl_seconds = 60

[endpoints.internal]
endpoint = "http://localhost:4000"
list_models_cmd = "python3 -m code_assistant_manager.v1_models"

[endpoints.bare]
endpoint = "https://bare.example.com"
"#;

#[test]
fn parses_all_sections_with_defaults() {
    let settings = parse_settings(SAMPLE).unwrap();
    assert_eq!(settings.common.cache_ttl_seconds, 7200);
    assert_eq!(
        settings.common.proxy.http_proxy.as_deref(),
        Some("http://proxy:3128")
    );
    assert_eq!(settings.endpoints.len(), 4);

    let gateway = &settings.endpoints["gateway"];
    assert_eq!(gateway.url, "https://gw.example.com");
    assert_eq!(gateway.supported_clients, vec!["claude", "codex"]);
    assert!(gateway.use_proxy);
    // Falls back to the common TTL.
    assert_eq!(gateway.cache_ttl_secs, 7200);
    assert!(matches!(gateway.discovery, Discovery::External(_)));
}

#[test]
fn static_list_wins_over_command() {
    let settings = parse_settings(SAMPLE).unwrap();
    let pinned = &settings.endpoints["pinned"];
    assert_eq!(
        pinned.discovery,
        Discovery::Static(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(pinned.cache_ttl_secs, 60);
}

#[test]
fn internal_routine_is_resolved_at_load_time() {
    let settings = parse_settings(SAMPLE).unwrap();
    assert_eq!(
        settings.endpoints["internal"].discovery,
        Discovery::InProcess(ListingRoutine::V1Models)
    );
}

#[test]
fn endpoint_without_discovery_has_none() {
    let settings = parse_settings(SAMPLE).unwrap();
    assert_eq!(settings.endpoints["bare"].discovery, Discovery::None);
    // No common override → the compiled default.
    assert!(settings.endpoints["bare"].supports_client("anything"));
}

#[test]
fn bad_entry_is_discarded_without_failing_the_rest() {
    let contents = r#"
[endpoints.good]
endpoint = "https://good.example.com"

[endpoints.broken]
description = "missing the required endpoint URL"

[endpoints.wrong-type]
endpoint = "https://typed.example.com"
list_of_models = "not-an-array"
"#;
    let settings = parse_settings(contents).unwrap();
    assert_eq!(settings.endpoints.len(), 1);
    assert!(settings.endpoints.contains_key("good"));
}

#[test]
fn malformed_document_is_an_error() {
    assert!(parse_settings("this is [not toml").is_err());
}

#[test]
fn empty_document_yields_defaults() {
    let settings = parse_settings("").unwrap();
    assert!(settings.endpoints.is_empty());
    assert_eq!(
        settings.common.cache_ttl_seconds,
        crate::constants::DEFAULT_CACHE_TTL_SECS
    );
}

#[test]
fn store_memoizes_until_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[endpoints.a]\nendpoint = \"https://a.example.com\"\n").unwrap();

    let store = ConfigStore::new(&path);
    assert!(store.settings().unwrap().endpoints.contains_key("a"));

    // A change on disk is not visible through the memoized copy...
    fs::write(&path, "[endpoints.b]\nendpoint = \"https://b.example.com\"\n").unwrap();
    assert!(store.settings().unwrap().endpoints.contains_key("a"));

    // ...until an explicit reload.
    let fresh = store.reload().unwrap();
    assert!(fresh.endpoints.contains_key("b"));
    assert!(!fresh.endpoints.contains_key("a"));
}

#[test]
fn first_load_writes_a_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let store = ConfigStore::new(&path);
    let settings = store.settings().unwrap();
    assert!(settings.endpoints.is_empty());
    assert!(path.exists());
    assert!(fs::read_to_string(&path).unwrap().contains("[common]"));
}
