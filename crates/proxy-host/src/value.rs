use serde_json::{Map, Value};

/// Loose presence check for untyped arguments: `null`, `false`, zero, and
/// empty strings, arrays or objects all count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Fetch `key` only when it is present in the [`is_present`] sense.
pub fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| is_present(value))
}

/// Fetch `key`, substituting `default` when it is missing or `null`.
pub fn or_default(map: &Map<String, Value>, key: &str, default: Value) -> Value {
    match map.get(key) {
        Some(Value::Null) | None => default,
        Some(value) => value.clone(),
    }
}

/// Fetch `key` as-is, `null` when missing.
pub fn or_null(map: &Map<String, Value>, key: &str) -> Value {
    map.get(key).cloned().unwrap_or(Value::Null)
}

/// Render a value for natural-language text: strings raw, everything else as
/// JSON text.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
