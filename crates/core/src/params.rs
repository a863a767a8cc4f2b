//! Lenient typed lookups on a `serde_json::Value` object.
//!
//! Parameter objects come from collaborators (CLI flags, saved settings) and
//! are allowed to be partial or sloppy. Each helper returns the default when
//! the key is missing or holds the wrong JSON type; none of them fail.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from a non-negative integer at `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `u64` from a non-negative integer at `params[name]`.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// Extracts a string from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
