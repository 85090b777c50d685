use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityType;

/// One accepted status transition. Written once, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub from_status: String,
    pub to_status: String,
    pub actor_id: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
