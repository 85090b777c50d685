//! Document conversion helpers.
//!
//! Entities travel to and from the store as flat JSON objects. These helpers
//! isolate timestamp formatting, field-name checks, and the typed
//! encode/decode steps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Keys owned by the store. Callers never write them through a patch.
pub const RESERVED_KEYS: &[&str] = &["id", "created_at", "updated_at"];

/// Fixed-width RFC 3339 (microseconds, `Z`) so lexical order is time order.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Field names are spliced into JSON paths, so only `[A-Za-z0-9_]` is allowed.
///
/// # Errors
///
/// Returns `StoreError::Query` for an empty or otherwise invalid name.
pub fn validate_field_name(field: &str) -> Result<(), StoreError> {
    if !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(StoreError::Query(format!("invalid field name '{field}'")))
    }
}

/// Serialize a value into a flat JSON object.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the value is not a JSON object.
pub fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Decode a stored document into a typed entity.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the document does not match `T`.
pub fn decode<T: DeserializeOwned>(data: &Map<String, Value>) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(data.clone())).map_err(StoreError::from)
}
