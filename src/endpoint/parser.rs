//! Normalizes raw discovery output into validated model identifiers.
//!
//! JSON is tried first (OpenAI `{"data":[{"id":...}]}` or a bare array of
//! such objects); anything else falls back to whitespace-separated text.
//! Every surviving token passes through `validate_model_id`. No implicit
//! deduplication; ordering is preserved exactly as encountered.

use serde_json::Value;

use super::validate::validate_model_id;

/// Parses a raw discovery output into a list of model identifiers.
pub fn parse_models_output(output: &str) -> Vec<String> {
    if let Ok(value) = serde_json::from_str::<Value>(output) {
        if let Some(models) = parse_json_models(&value) {
            return models;
        }
    }
    parse_text_models(output)
}

/// Extracts `id` fields from OpenAI-style JSON shapes.
///
/// Returns `None` only when the top-level shape matches neither form, so
/// the caller can fall through to text mode. A matching shape with zero
/// usable ids yields an empty list, not a fallthrough.
fn parse_json_models(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Object(map) => map.get("data")?.as_array()?,
        Value::Array(items) => items,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_str))
            .filter(|id| validate_model_id(id))
            .map(str::to_string)
            .collect(),
    )
}

/// Splits freeform text output into model tokens.
///
/// Output that looks like an error message ("error" or "expected" anywhere,
/// case-insensitive) yields an empty list rather than being mistaken for
/// model names.
fn parse_text_models(output: &str) -> Vec<String> {
    let lowered = output.to_lowercase();
    if lowered.contains("error") || lowered.contains("expected") {
        return Vec::new();
    }

    output
        .lines()
        .flat_map(str::split_whitespace)
        .filter(|token| validate_model_id(token))
        .map(str::to_string)
        .collect()
}
