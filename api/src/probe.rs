/// Defensive access into loosely-shaped upstream JSON.
///
/// No caller trusts a field's presence: every reader here resolves to
/// `Option` and coerces leniently (numeric strings parse as numbers), so a
/// malformed payload degrades to "field absent" instead of an error.
use serde_json::Value;

/// Walk `path` into `value`. Object keys match by name; a segment that
/// parses as an index steps into arrays. Any miss yields `None`.
pub fn pluck<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for step in path {
        current = match current {
            Value::Object(map) => map.get(*step)?,
            Value::Array(items) => items.get(step.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn pluck_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    pluck(value, path)?.as_str()
}

pub fn pluck_string(value: &Value, path: &[&str]) -> Option<String> {
    pluck(value, path).and_then(coerce_string)
}

pub fn pluck_f64(value: &Value, path: &[&str]) -> Option<f64> {
    pluck(value, path).and_then(coerce_f64)
}

pub fn pluck_i64(value: &Value, path: &[&str]) -> Option<i64> {
    pluck(value, path).and_then(coerce_i64)
}

pub fn pluck_bool(value: &Value, path: &[&str]) -> Option<bool> {
    pluck(value, path)?.as_bool()
}

pub fn pluck_array<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    pluck(value, path)?.as_array()
}

/// Probe an ordered fallback chain of paths and return the first non-empty
/// array. Upstream nests the same data under different roots depending on
/// sport and endpoint revision.
pub fn first_non_empty_array<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a Vec<Value>> {
    paths
        .iter()
        .find_map(|path| pluck_array(value, path).filter(|items| !items.is_empty()))
}

/// Coerce one value to f64: numbers directly, numeric strings parsed.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
