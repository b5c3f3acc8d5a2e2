//! Validation gates for URLs, secrets, and model identifiers.
//!
//! `validate_model_id` is the single gate through which every model string
//! must pass before entering a cache record or being returned to a caller.

use url::Url;

use crate::constants::{MODEL_ID_FORBIDDEN_CHARS, MODEL_ID_MAX_LEN, SECRET_MAX_LEN};

/// Parses and validates an endpoint URL.
///
/// Accepts absolute `http`/`https` URLs with a non-empty host. Returns a
/// human-readable reason on failure.
pub fn validate_url(raw: &str) -> Result<Url, String> {
    if raw.is_empty() {
        return Err("missing endpoint URL".to_string());
    }
    let url = Url::parse(raw).map_err(|e| format!("invalid URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported URL scheme '{other}' (expected http or https)")),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("URL '{raw}' has no host"));
    }
    Ok(url)
}

/// Whether a non-empty secret has an acceptable token shape.
///
/// Absence of a secret is valid and checked by the caller; this gate only
/// bounds what a present secret may look like: printable, no embedded
/// control characters or whitespace, bounded length.
pub fn validate_secret(secret: &str) -> bool {
    !secret.is_empty()
        && secret.len() <= SECRET_MAX_LEN
        && secret.chars().all(|c| !c.is_control() && !c.is_whitespace())
}

/// Whether a token is a usable model identifier.
///
/// Non-empty, bounded, free of control characters, whitespace, and
/// shell-significant characters.
pub fn validate_model_id(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MODEL_ID_MAX_LEN
        && token.chars().all(|c| {
            !c.is_control() && !c.is_whitespace() && !MODEL_ID_FORBIDDEN_CHARS.contains(&c)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_url("https://api.example.com/v1").is_ok());
        assert!(validate_url("http://localhost:4000").is_ok());
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("ftp://files.example.com").is_err());
        assert!(validate_url("https://").is_err());
        // Relative paths are not absolute URLs
        assert!(validate_url("/v1/models").is_err());
    }

    #[test]
    fn secret_shape() {
        assert!(validate_secret("sk-abc123_XYZ"));
        assert!(!validate_secret(""));
        assert!(!validate_secret("has space"));
        assert!(!validate_secret("ctrl\x07char"));
        assert!(!validate_secret(&"x".repeat(SECRET_MAX_LEN + 1)));
    }

    #[test]
    fn model_id_accepts_common_shapes() {
        for id in ["gpt-4", "gpt-3.5-turbo", "org/model:free", "llama3:latest", "--list"] {
            assert!(validate_model_id(id), "rejected {id}");
        }
    }

    #[test]
    fn model_id_rejects_shell_noise() {
        for id in ["", "a b", "rm;rf", "a|b", "$(boom)", "`tick`", "a\tb", "x\ny"] {
            assert!(!validate_model_id(id), "accepted {id:?}");
        }
        assert!(!validate_model_id(&"m".repeat(MODEL_ID_MAX_LEN + 1)));
    }
}
