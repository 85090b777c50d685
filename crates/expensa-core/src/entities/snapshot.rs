use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the requester's profile, embedded into a lifecycle
/// record when it is first submitted.
///
/// Never edited in place: a later capture replaces the whole value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RequesterSnapshot {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub role_title: Option<String>,
    pub org_unit: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub manager: Option<String>,
    pub municipality: Option<String>,
    pub captured_at: DateTime<Utc>,
    /// What triggered the capture, e.g. `status_change:draft->pending`.
    pub source: String,
}
