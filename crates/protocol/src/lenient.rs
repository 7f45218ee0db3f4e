//! Lenient field decoders.
//!
//! The backend (and anything else that can post to the feed) is not strict about
//! JSON types: amounts arrive as numbers or numeric strings, ids as strings or
//! numbers. These helpers are used with `#[serde(default, deserialize_with = ...)]`
//! so a single odd field never rejects the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a numeric field.
///
/// - absent / `null` / empty string → `None`
/// - number or numeric string → `Some(n)`
/// - booleans → `Some(1.0)` / `Some(0.0)`
/// - anything else → `Some(NaN)`, so callers can tell "present but unusable"
///   from "absent"
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Decode a text field. Empty strings count as absent; numbers keep their JSON text.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value))
}

pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}

pub fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
