use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AttachmentOrigin, OwnerType};

/// Liveness of an attachment row. Deleted rows are kept for audit continuity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttachmentState {
    #[default]
    Active,
    Deleted {
        deleted_at: DateTime<Utc>,
        deleted_by: String,
    },
}

impl AttachmentState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { deleted_at, .. } => Some(*deleted_at),
        }
    }
}

/// One logical file slot on an owner. Re-uploading the same file name onto
/// the same owner bumps `version` on this row instead of adding a sibling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Attachment {
    pub id: String,
    pub owner_type: OwnerType,
    pub owner_id: String,
    pub origin: AttachmentOrigin,
    pub category: String,
    pub original_name: String,
    pub signed_url: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub version: u32,
    pub visible_to_submitter: bool,
    #[serde(default)]
    pub state: AttachmentState,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub line_item_id: Option<String>,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attachment {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
