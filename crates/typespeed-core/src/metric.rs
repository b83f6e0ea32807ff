//! Typing-speed metric extraction.
//!
//! Upstream bodies look like `{"data":{"wpm":87.5,...}}`. Extraction is
//! best-effort: a numeric `data.wpm` is formatted with two decimals, any
//! other `data` is rendered as-is. A body that is not a JSON object fails to
//! decode; an object without `data` is `MissingField`.

use serde_json::Value;

use crate::error::{Result, TypeSpeedError};

/// Store key holding the latest metric.
pub const METRIC_KEY: &str = "type_speed";

/// Value written when seeding the key or resetting after a failed fetch.
pub const RESET_VALUE: &str = "0";

/// Extract the cached string from an upstream response body.
pub fn extract_wpm(body: &[u8]) -> Result<String> {
    let root: Value = serde_json::from_slice(body)
        .map_err(|e| TypeSpeedError::DecodeError(e.to_string()))?;

    let obj = root
        .as_object()
        .ok_or_else(|| TypeSpeedError::DecodeError("response is not a JSON object".into()))?;
    let data = obj.get("data").ok_or(TypeSpeedError::MissingField("data"))?;

    if let Some(wpm) = data.get("wpm").and_then(Value::as_f64) {
        return Ok(format!("{wpm:.2}"));
    }
    Ok(render(data))
}

// Strings unquoted, everything else compact JSON.
fn render(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
