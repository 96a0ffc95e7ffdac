//! Template filters registered in every template set.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tera::{Result, Value};

/// Layout used by [`human_date`].
pub const HUMAN_DATE_FORMAT: &str = "%d %b %Y at %H:%M";

/// Formats an RFC 3339 timestamp as `02 Jan 2006 at 15:04` in UTC.
///
/// Null renders as the empty string.
pub fn human_date(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let raw = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) => s,
        other => return Err(tera::Error::msg(format!("human_date expects a timestamp, got {other}"))),
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date cannot parse '{raw}': {e}")))?;
    Ok(Value::String(
        parsed.with_timezone(&Utc).format(HUMAN_DATE_FORMAT).to_string(),
    ))
}
