//! Lifecycle record repository.
//!
//! Generic CRUD over the three lifecycle record types. Status and the
//! fields stamped by transition hooks are off limits here; they only move
//! through the status engine.

use chrono::Utc;
use expensa_core::identity::Actor;
use expensa_core::transitions::{Lifecycle, LifecycleStatus};
use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::helpers::{RESERVED_KEYS, decode, format_timestamp};
use crate::service::ExpensaService;
use crate::store::Filter;

/// Keys written only by the status engine or at creation.
pub const ENGINE_OWNED_KEYS: &[&str] = &[
    "status",
    "created_by",
    "requester_snapshot",
    "analysis_date",
    "analyst_email",
    "paid_at",
];

/// Filter criteria for [`ExpensaService::list_records`].
#[derive(Debug, Clone)]
pub struct RecordFilter<S> {
    pub status: Option<S>,
    pub created_by: Option<String>,
    pub limit: Option<u32>,
}

impl<S> Default for RecordFilter<S> {
    fn default() -> Self {
        Self {
            status: None,
            created_by: None,
            limit: None,
        }
    }
}

fn reject_protected_keys(fields: &Map<String, Value>) -> Result<(), ServiceError> {
    let mut protected: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|k| RESERVED_KEYS.contains(k) || ENGINE_OWNED_KEYS.contains(k))
        .collect();
    if protected.is_empty() {
        return Ok(());
    }
    protected.sort_unstable();
    Err(ServiceError::validation(format!(
        "field(s) {} cannot be set directly",
        protected.join(", ")
    )))
}

/// Decode a would-be document so malformed payloads never reach the store.
fn check_shape<L: Lifecycle>(mut probe: Map<String, Value>) -> Result<(), ServiceError> {
    let now = Value::String(format_timestamp(Utc::now()));
    probe
        .entry("id")
        .or_insert_with(|| Value::String(String::new()));
    probe.entry("created_at").or_insert_with(|| now.clone());
    probe.entry("updated_at").or_insert(now);
    decode::<L>(&probe).map(|_| ()).map_err(|e| {
        ServiceError::validation(format!("invalid {}: {e}", L::ENTITY_TYPE))
    })
}

impl ExpensaService {
    /// Create a record in its initial status, owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Core(Validation)` if `fields` set a protected
    /// key or do not form a valid record.
    pub async fn create_record<L: Lifecycle>(
        &self,
        mut fields: Map<String, Value>,
        actor: &Actor,
    ) -> Result<L, ServiceError> {
        reject_protected_keys(&fields)?;
        fields.insert("status".into(), Value::String(L::INITIAL.as_str().into()));
        fields.insert("created_by".into(), Value::String(actor.id.clone()));
        check_shape::<L>(fields.clone())?;

        let record = self.store().create(L::ENTITY_TYPE, fields).await?;
        let created: L = record.decode()?;

        tracing::info!(
            entity_type = %L::ENTITY_TYPE,
            id = %record.id,
            actor = %actor.id,
            "record created"
        );
        self.audit_create(L::ENTITY_TYPE, &record.id, &record.data, actor)
            .await;
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Core(NotFound)` if no record has this id.
    pub async fn get_record<L: Lifecycle>(&self, id: &str) -> Result<L, ServiceError> {
        let record = self.store().get(L::ENTITY_TYPE, id).await?;
        Ok(record.decode()?)
    }

    /// Records matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the query fails.
    pub async fn list_records<L: Lifecycle>(
        &self,
        filter: &RecordFilter<L::Status>,
    ) -> Result<Vec<L>, ServiceError> {
        let mut query = Filter::new().sort_desc("created_at");
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(ref created_by) = filter.created_by {
            query = query.eq("created_by", created_by.as_str());
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        let rows = self.store().filter(L::ENTITY_TYPE, &query).await?;
        rows.iter()
            .map(|r| r.decode().map_err(ServiceError::from))
            .collect()
    }

    /// Edit free-form fields. Audited with the field diff.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Core(Validation)` if `patch` touches a
    /// protected key or breaks the record shape, or `NotFound`.
    pub async fn update_record<L: Lifecycle>(
        &self,
        id: &str,
        patch: Map<String, Value>,
        actor: &Actor,
    ) -> Result<L, ServiceError> {
        reject_protected_keys(&patch)?;
        let before = self.store().get(L::ENTITY_TYPE, id).await?;
        if patch.is_empty() {
            return Ok(before.decode()?);
        }

        let mut probe = before.data.clone();
        probe.extend(patch.clone());
        check_shape::<L>(probe)?;

        let after = self.store().update(L::ENTITY_TYPE, id, patch).await?;
        let updated: L = after.decode()?;

        tracing::info!(entity_type = %L::ENTITY_TYPE, id, actor = %actor.id, "record updated");
        self.audit_update(L::ENTITY_TYPE, id, &before.data, &after.data, actor)
            .await;
        Ok(updated)
    }
}
