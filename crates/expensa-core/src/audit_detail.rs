//! Typed audit detail payloads.
//!
//! Each audit action carries a structured `detail` JSON blob whose shape
//! depends on the action. [`diff_fields`] produces the `changes` map used by
//! `update` entries.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One changed field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

/// Detail for `AuditAction::StatusChange`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub note: String,
}

/// Detail for `AuditAction::Update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UpdatedDetail {
    pub changes: BTreeMap<String, FieldChange>,
}

/// Detail for `AuditAction::Create`: the stored fields of the new row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedDetail {
    pub fields: Map<String, Value>,
}

/// Detail for `AuditAction::Upload` and `AuditAction::Download`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileDetail {
    pub owner_type: String,
    pub owner_id: String,
    pub original_name: String,
    pub version: u32,
    pub size_bytes: u64,
    pub signed_url: String,
}

/// Detail for `AuditAction::Replace`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReplacedDetail {
    pub from_version: u32,
    pub to_version: u32,
    pub previous_name: String,
    pub previous_url: String,
    pub original_name: String,
    pub signed_url: String,
}

/// Detail for `AuditAction::Delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeletedDetail {
    pub soft: bool,
    pub original_name: Option<String>,
}

/// Compare two flat key-value snapshots and keep only keys whose values
/// differ. A key missing on one side compares as `null`.
#[must_use]
pub fn diff_fields(before: &Map<String, Value>, after: &Map<String, Value>) -> UpdatedDetail {
    let mut changes = BTreeMap::new();
    for key in before.keys().chain(after.keys()) {
        if changes.contains_key(key) {
            continue;
        }
        let from = before.get(key).cloned().unwrap_or(Value::Null);
        let to = after.get(key).cloned().unwrap_or(Value::Null);
        if from != to {
            changes.insert(key.clone(), FieldChange { from, to });
        }
    }
    UpdatedDetail { changes }
}
