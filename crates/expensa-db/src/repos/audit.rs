//! Audit log service.
//!
//! Append-only entries recording every mutating or sensitive action.
//! [`ExpensaService::record_audit`] is the boundary primary operations call:
//! it returns `()` and only logs when the write fails, so auditing can never
//! abort the action being audited.

use expensa_core::audit_detail::{
    CreatedDetail, DeletedDetail, FileDetail, ReplacedDetail, StatusChangedDetail, diff_fields,
};
use expensa_core::entities::{Attachment, AuditEntry};
use expensa_core::enums::{AuditAction, EntityType};
use expensa_core::identity::{Actor, ActorRef};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ServiceError, StoreError};
use crate::helpers::{RESERVED_KEYS, to_object};
use crate::service::ExpensaService;
use crate::store::Filter;

/// One action to be written to the audit log.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub detail: Option<Value>,
    /// May be incomplete; the service resolves the current actor then.
    pub actor: ActorRef,
}

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    pub limit: Option<u32>,
}

struct ResolvedActor {
    id: String,
    name: String,
    email: String,
}

#[derive(Serialize)]
struct NewAuditEntry<'a> {
    entity_type: EntityType,
    entity_id: &'a str,
    action: AuditAction,
    detail: Option<&'a Value>,
    actor_id: String,
    actor_name: String,
    actor_email: String,
    client_host: Option<&'a str>,
    user_agent: Option<&'a str>,
}

fn to_detail<T: Serialize>(detail: &T) -> Option<Value> {
    match serde_json::to_value(detail) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "audit detail could not be serialized; writing without it");
            None
        }
    }
}

fn without_reserved(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl ExpensaService {
    /// Write an audit entry. Never fails: any error is logged and dropped.
    pub async fn record_audit(&self, record: AuditRecord) {
        let entity_type = record.entity_type;
        let action = record.action;
        let entity_id = record.entity_id.clone();
        if let Err(e) = self.try_record_audit(record).await {
            tracing::warn!(
                %entity_type,
                entity_id = %entity_id,
                %action,
                error = %e,
                "audit write failed; primary action unaffected"
            );
        }
    }

    /// Fallible audit write. Prefer [`Self::record_audit`] inside primary
    /// operations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the entry cannot be persisted.
    pub async fn try_record_audit(&self, record: AuditRecord) -> Result<AuditEntry, StoreError> {
        let actor = self.resolve_audit_actor(&record.actor).await;
        let settings = self.audit_settings();
        let entry = NewAuditEntry {
            entity_type: record.entity_type,
            entity_id: &record.entity_id,
            action: record.action,
            detail: record.detail.as_ref(),
            actor_id: actor.id,
            actor_name: actor.name,
            actor_email: actor.email,
            client_host: settings.client_host.as_deref(),
            user_agent: settings.user_agent.as_deref(),
        };
        let created = self
            .store()
            .create(EntityType::AuditLog, to_object(&entry)?)
            .await?;
        created.decode()
    }

    /// Complete actor as given, else the current session, else the system
    /// identity.
    async fn resolve_audit_actor(&self, actor: &ActorRef) -> ResolvedActor {
        if actor.is_complete() {
            let id = actor.id.clone().unwrap_or_default();
            let email = actor.email.clone().unwrap_or_default();
            let name = actor
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email.clone());
            return ResolvedActor { id, name, email };
        }

        match self.identity().current_actor().await {
            Ok(current) => ResolvedActor {
                id: current.id,
                name: current.name,
                email: current.email,
            },
            Err(e) => {
                tracing::debug!(error = %e, "no current actor; auditing as system");
                let settings = self.audit_settings();
                ResolvedActor {
                    id: settings.system_actor_id.clone(),
                    name: settings.system_actor_id.clone(),
                    email: settings.system_email.clone(),
                }
            }
        }
    }

    pub async fn audit_create(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        fields: &Map<String, Value>,
        actor: &Actor,
    ) {
        let detail = CreatedDetail {
            fields: without_reserved(fields),
        };
        self.record_audit(AuditRecord {
            entity_type,
            entity_id: entity_id.to_string(),
            action: AuditAction::Create,
            detail: to_detail(&detail),
            actor: actor.into(),
        })
        .await;
    }

    /// Audit an update with the field diff of `before` → `after`.
    /// Store-owned keys are ignored; nothing is written when no field changed.
    pub async fn audit_update(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        before: &Map<String, Value>,
        after: &Map<String, Value>,
        actor: &Actor,
    ) {
        let diff = diff_fields(&without_reserved(before), &without_reserved(after));
        if diff.changes.is_empty() {
            tracing::debug!(%entity_type, entity_id, "update changed nothing; not audited");
            return;
        }
        self.record_audit(AuditRecord {
            entity_type,
            entity_id: entity_id.to_string(),
            action: AuditAction::Update,
            detail: to_detail(&diff),
            actor: actor.into(),
        })
        .await;
    }

    pub async fn audit_status_change(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        from: &str,
        to: &str,
        note: &str,
        actor: &Actor,
    ) {
        let detail = StatusChangedDetail {
            from: from.to_string(),
            to: to.to_string(),
            note: note.to_string(),
        };
        self.record_audit(AuditRecord {
            entity_type,
            entity_id: entity_id.to_string(),
            action: AuditAction::StatusChange,
            detail: to_detail(&detail),
            actor: actor.into(),
        })
        .await;
    }

    pub async fn audit_upload(&self, attachment: &Attachment, actor: &Actor) {
        self.audit_file(AuditAction::Upload, attachment, actor).await;
    }

    pub async fn audit_download(&self, attachment: &Attachment, actor: &Actor) {
        self.audit_file(AuditAction::Download, attachment, actor).await;
    }

    async fn audit_file(&self, action: AuditAction, attachment: &Attachment, actor: &Actor) {
        let detail = FileDetail {
            owner_type: attachment.owner_type.as_str().to_string(),
            owner_id: attachment.owner_id.clone(),
            original_name: attachment.original_name.clone(),
            version: attachment.version,
            size_bytes: attachment.size_bytes,
            signed_url: attachment.signed_url.clone(),
        };
        self.record_audit(AuditRecord {
            entity_type: EntityType::Attachment,
            entity_id: attachment.id.clone(),
            action,
            detail: to_detail(&detail),
            actor: actor.into(),
        })
        .await;
    }

    pub async fn audit_replace(&self, previous: &Attachment, current: &Attachment, actor: &Actor) {
        let detail = ReplacedDetail {
            from_version: previous.version,
            to_version: current.version,
            previous_name: previous.original_name.clone(),
            previous_url: previous.signed_url.clone(),
            original_name: current.original_name.clone(),
            signed_url: current.signed_url.clone(),
        };
        self.record_audit(AuditRecord {
            entity_type: EntityType::Attachment,
            entity_id: current.id.clone(),
            action: AuditAction::Replace,
            detail: to_detail(&detail),
            actor: actor.into(),
        })
        .await;
    }

    pub async fn audit_delete(&self, attachment: &Attachment, actor: &Actor) {
        let detail = DeletedDetail {
            soft: true,
            original_name: Some(attachment.original_name.clone()),
        };
        self.record_audit(AuditRecord {
            entity_type: EntityType::Attachment,
            entity_id: attachment.id.clone(),
            action: AuditAction::Delete,
            detail: to_detail(&detail),
            actor: actor.into(),
        })
        .await;
    }

    /// Query audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, ServiceError> {
        let mut query = Filter::new()
            .sort_desc("created_at")
            .limit(filter.limit.unwrap_or(100));
        if let Some(et) = filter.entity_type {
            query = query.eq("entity_type", et.as_str());
        }
        if let Some(ref eid) = filter.entity_id {
            query = query.eq("entity_id", eid.as_str());
        }
        if let Some(action) = filter.action {
            query = query.eq("action", action.as_str());
        }
        if let Some(ref actor_id) = filter.actor_id {
            query = query.eq("actor_id", actor_id.as_str());
        }

        let rows = self.store().filter(EntityType::AuditLog, &query).await?;
        rows.iter()
            .map(|r| r.decode().map_err(ServiceError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, requester, test_service, test_service_with_identity};
    use crate::identity::StaticIdentity;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn record_uses_complete_actor() {
        let svc = test_service().await;
        let actor = admin();
        let entry = svc
            .try_record_audit(AuditRecord {
                entity_type: EntityType::FundingRequest,
                entity_id: "fr-1".into(),
                action: AuditAction::Create,
                detail: Some(json!({"fields": {}})),
                actor: (&actor).into(),
            })
            .await
            .unwrap();

        assert!(entry.id.starts_with("aud-"));
        assert_eq!(entry.actor_id, actor.id);
        assert_eq!(entry.actor_email, actor.email);
        assert_eq!(entry.client_host.as_deref(), Some("10.0.0.9"));
    }

    #[tokio::test]
    async fn incomplete_actor_resolves_current_session() {
        let svc = test_service().await;
        let entry = svc
            .try_record_audit(AuditRecord {
                entity_type: EntityType::Attachment,
                entity_id: "att-1".into(),
                action: AuditAction::Download,
                detail: None,
                actor: ActorRef {
                    id: Some("usr-x".into()),
                    name: None,
                    email: None,
                },
            })
            .await
            .unwrap();
        assert_eq!(entry.actor_id, requester().id);
    }

    #[tokio::test]
    async fn missing_session_falls_back_to_system() {
        let svc = test_service_with_identity(StaticIdentity::anonymous()).await;
        let entry = svc
            .try_record_audit(AuditRecord {
                entity_type: EntityType::Attachment,
                entity_id: "att-1".into(),
                action: AuditAction::Download,
                detail: None,
                actor: ActorRef::default(),
            })
            .await
            .unwrap();
        assert_eq!(entry.actor_id, "system");
        assert_eq!(entry.actor_email, "system@expensa.test");
    }

    #[tokio::test]
    async fn update_without_changes_is_not_audited() {
        let svc = test_service().await;
        let before = json!({"title": "A", "updated_at": "t1"});
        let after = json!({"title": "A", "updated_at": "t2"});
        svc.audit_update(
            EntityType::ExpenseReport,
            "er-1",
            before.as_object().unwrap(),
            after.as_object().unwrap(),
            &requester(),
        )
        .await;

        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn update_records_field_diff() {
        let svc = test_service().await;
        let before = json!({"title": "A", "notes": null});
        let after = json!({"title": "B", "notes": null});
        svc.audit_update(
            EntityType::ExpenseReport,
            "er-1",
            before.as_object().unwrap(),
            after.as_object().unwrap(),
            &requester(),
        )
        .await;

        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Update);
        assert_eq!(
            entries[0].detail,
            Some(json!({"changes": {"title": {"from": "A", "to": "B"}}}))
        );
    }

    #[tokio::test]
    async fn query_filters_and_orders_newest_first() {
        let svc = test_service().await;
        let actor = admin();
        for (id, action) in [
            ("fr-1", AuditAction::Create),
            ("fr-1", AuditAction::StatusChange),
            ("fr-2", AuditAction::Create),
        ] {
            svc.record_audit(AuditRecord {
                entity_type: EntityType::FundingRequest,
                entity_id: id.into(),
                action,
                detail: None,
                actor: (&actor).into(),
            })
            .await;
        }

        let fr1 = svc
            .query_audit(&AuditFilter {
                entity_id: Some("fr-1".into()),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(fr1.len(), 2);
        assert_eq!(fr1[0].action, AuditAction::StatusChange);
        assert_eq!(fr1[1].action, AuditAction::Create);

        let creates = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Create),
                actor_id: Some(actor.id.clone()),
                limit: Some(1),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].entity_id, "fr-2");
    }
}
