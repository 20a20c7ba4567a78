use serde_json::Value;

const BODY_KEY: &str = "body";

/// Strip a `{statusCode, body}` wrapper from a remote result.
///
/// When `raw` is an object carrying `body`, the body is the authoritative
/// result: a string body is decoded as JSON, anything else is returned as-is.
/// Every other value passes through untouched. `statusCode` is never read.
pub fn unwrap(raw: Value) -> Result<Value, serde_json::Error> {
    match raw {
        Value::Object(mut map) if map.contains_key(BODY_KEY) => {
            match map.remove(BODY_KEY).unwrap_or(Value::Null) {
                Value::String(text) => serde_json::from_str(&text),
                body => Ok(body),
            }
        }
        other => Ok(other),
    }
}

/// Article-qualified JSON type name for error messages, e.g. `an array`.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
