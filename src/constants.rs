//! Centralized constants for camgr.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and the config directory path.
pub const APP_NAME: &str = "camgr";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "settings.toml";

/// Cache directory name under `$XDG_CACHE_HOME` (default `~/.cache`).
pub const CACHE_DIR_NAME: &str = "code-assistant-manager";

/// Filename prefix for per-endpoint model cache records.
pub const CACHE_FILE_PREFIX: &str = "code_assistant_manager_models_cache_";

// --- Time-to-live defaults ---

/// Default model cache TTL in seconds (24 hours).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// In-memory TTL for the parsed settings file.
pub const SETTINGS_MEMO_TTL_SECS: u64 = 60;

// --- Discovery ---

/// Timeout for external model-listing commands.
pub const DISCOVERY_TIMEOUT_SECS: u64 = 60;

/// HTTP timeout for the in-process `/v1/models` listing routine.
pub const LISTING_HTTP_TIMEOUT_SECS: u64 = 30;

/// Internal listing routines that may be invoked in-process when a
/// discovery command names them via `-m <routine>`.
pub const INTERNAL_LIST_ROUTINES: &[&str] = &["code_assistant_manager.v1_models"];

/// Environment variable carrying the endpoint URL into discovery.
pub const ENV_ENDPOINT: &str = "endpoint";

/// Environment variable carrying the resolved secret into discovery.
pub const ENV_API_KEY: &str = "api_key";

/// Proxy variables injected into or stripped from the discovery environment.
pub const PROXY_ENV_VARS: &[&str] = &[
    "http_proxy",
    "https_proxy",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "no_proxy",
    "NO_PROXY",
];

// --- Secret resolution ---

/// Generic fallback environment variable for endpoint secrets.
pub const GENERIC_API_KEY_VAR: &str = "API_KEY";

/// Legacy endpoint-name → environment-variable aliases, kept for
/// backward compatibility only. New endpoints must not rely on these.
pub const LEGACY_API_KEY_ALIASES: &[(&str, &str)] = &[
    ("copilot-api", "API_KEY_COPILOT"),
    ("litellm", "API_KEY_LITELLM"),
];

// --- Validation bounds ---

/// Maximum accepted secret length in bytes.
pub const SECRET_MAX_LEN: usize = 1024;

/// Maximum accepted model identifier length in bytes.
pub const MODEL_ID_MAX_LEN: usize = 256;

/// Characters that disqualify a token from being a model identifier.
/// Anything shell-significant is rejected at the single validation gate.
pub const MODEL_ID_FORBIDDEN_CHARS: &[char] = &[
    ';', '&', '|', '<', '>', '`', '$', '(', ')', '{', '}', '[', ']', '"', '\'', '\\', '*', '?',
    '~', '#', '!',
];
