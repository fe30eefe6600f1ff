use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of a typed decode of a fetched payload: either the list, or a
/// recorded reason the shape was unusable.
///
/// User-facing behavior may still degrade to an empty list, but the
/// coercion is never silent — callers get the reason and log it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Ok(Vec<T>),
    Malformed(String),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a list that arrives either as a bare JSON array or wrapped in an
/// object under `key` (the server wraps, older payloads did not).
#[must_use]
pub fn decode_list<T: DeserializeOwned>(payload: Value, key: &str) -> Decoded<T> {
    let list = match payload {
        Value::Array(_) => payload,
        Value::Object(mut map) => match map.remove(key) {
            Some(value @ Value::Array(_)) => value,
            Some(other) => {
                return Decoded::Malformed(format!(
                    "\"{key}\" is {}, expected an array",
                    kind_of(&other)
                ));
            }
            None => return Decoded::Malformed(format!("object payload is missing \"{key}\"")),
        },
        other => {
            return Decoded::Malformed(format!(
                "payload is {}, expected an array or a wrapping object",
                kind_of(&other)
            ));
        }
    };
    match serde_json::from_value(list) {
        Ok(items) => Decoded::Ok(items),
        Err(err) => Decoded::Malformed(err.to_string()),
    }
}
