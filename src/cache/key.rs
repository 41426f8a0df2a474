//! Key Derivation Module
//!
//! Builds the canonical cache key for an endpoint and its query parameters.

use serde::Serialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

// == Derive Key ==
/// Derives the cache key for `endpoint` called with `params`.
///
/// Parameters are sorted by name and rendered as `name=value` joined by `&`,
/// then appended to the endpoint after a `?`. An empty parameter set yields
/// the bare endpoint. Strings are rendered verbatim, other primitives as their
/// JSON text, and arrays/objects as JSON.
///
/// `params` must serialize to a JSON object; `()` or `None` count as empty.
///
/// Values are not escaped, so distinct parameter sets can share a key:
/// `{"a": "1&b=2"}` and `{"a": "1", "b": "2"}` both give `?a=1&b=2`, and the
/// string `"12"` renders the same as the number `12`. Callers that pass
/// free-form strings must accept that such requests share one entry.
///
/// # Errors
/// * `InvalidKey` - empty endpoint or a key longer than `MAX_KEY_LENGTH`
/// * `InvalidParams` - params that fail to serialize or are not a mapping
pub fn derive_key<P>(endpoint: &str, params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    if endpoint.is_empty() {
        return Err(CacheError::InvalidKey(
            "Endpoint identifier cannot be empty".to_string(),
        ));
    }

    let value = serde_json::to_value(params)
        .map_err(|e| CacheError::InvalidParams(e.to_string()))?;

    let mut pairs = match value {
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().collect::<Vec<_>>(),
        other => {
            return Err(CacheError::InvalidParams(format!(
                "Parameters must be a mapping, got {}",
                json_kind(&other)
            )))
        }
    };

    if pairs.is_empty() {
        return check_length(endpoint.to_string());
    }

    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut query = Vec::with_capacity(pairs.len());
    for (name, value) in &pairs {
        query.push(format!("{}={}", name, render_value(value)?));
    }

    check_length(format!("{}?{}", endpoint, query.join("&")))
}

// == Helpers ==
fn render_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).map_err(|e| CacheError::InvalidParams(e.to_string()))
        }
    }
}

fn check_length(key: String) -> Result<String> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(key)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
