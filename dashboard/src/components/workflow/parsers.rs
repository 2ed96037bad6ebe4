//! Defensive accessors for the opaque trace payload.

use serde_json::{Map, Value};

const PAYLOAD_INLINE_MAX_CHARS: usize = 160;

/// Some backends double-encode nested objects as JSON strings.
pub fn decode_json_payload(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|decoded| decoded.is_object() || decoded.is_array())
            .or_else(|| Some(Value::String(raw.clone()))),
        other => Some(other.clone()),
    }
}

pub fn pretty_json(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        _ => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    }
}

/// A non-empty string under `key`, or a number/bool rendered as text.
pub fn payload_str(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Key/value pairs for the detail panel, in payload key order.
///
/// Nested values are shown as compact JSON, cut to a readable length.
pub fn payload_entries(payload: &Map<String, Value>) -> Vec<(String, String)> {
    payload
        .iter()
        .map(|(key, value)| {
            let rendered = match decode_json_payload(Some(value)) {
                Some(Value::String(text)) => text,
                Some(Value::Null) | None => "null".to_string(),
                Some(other) => other.to_string(),
            };
            (key.clone(), truncate_chars(&rendered, PAYLOAD_INLINE_MAX_CHARS))
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
