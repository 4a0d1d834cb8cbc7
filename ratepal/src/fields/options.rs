//! Options codec for select and multi-select fields
//!
//! Stored options have drifted across versions: a JSON array, a legacy
//! `{"options": [...]}` wrapper, or a bare comma-separated string. Reading
//! accepts all of them and never fails; writing always emits a JSON array.

use crate::error::Result;
use serde_json::Value;

/// Decode a stored options column.
///
/// JSON is tried first; anything that is not an array or an object with an
/// `options` array falls back to splitting the raw text on commas.
pub fn decode(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => collect_items(&items),
        Ok(Value::Object(map)) => match map.get("options") {
            Some(Value::Array(items)) => collect_items(items),
            _ => {
                tracing::warn!("Options object without an options array: {}", raw);
                split_raw(raw)
            }
        },
        _ => split_raw(raw),
    }
}

/// Decode a nullable options column
pub fn decode_opt(raw: Option<&str>) -> Vec<String> {
    raw.map(decode).unwrap_or_default()
}

/// Decode options already parsed into JSON by a backend client.
///
/// A JSON string is treated as stored text and decoded again.
pub fn decode_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => collect_items(items),
        Value::Object(map) => match map.get("options") {
            Some(Value::Array(items)) => collect_items(items),
            _ => Vec::new(),
        },
        Value::String(raw) => decode(raw),
        Value::Null => Vec::new(),
        other => split_raw(&other.to_string()),
    }
}

/// Clean up an options list that is already in memory
pub fn normalize<S: AsRef<str>>(options: &[S]) -> Vec<String> {
    options
        .iter()
        .map(|o| o.as_ref().trim())
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

/// Canonical JSON array encoding written to the options column
pub fn encode<S: AsRef<str>>(options: &[S]) -> Result<String> {
    Ok(serde_json::to_string(&normalize(options))?)
}

fn collect_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_raw(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
