//! Status history ledger.
//!
//! One immutable row per accepted transition, written only by the status
//! engine. There is no update or delete.

use expensa_core::entities::StatusHistoryEntry;
use expensa_core::enums::EntityType;
use serde::Serialize;

use crate::error::ServiceError;
use crate::helpers::to_object;
use crate::service::ExpensaService;
use crate::store::Filter;

#[derive(Serialize)]
struct NewHistoryEntry<'a> {
    entity_type: EntityType,
    entity_id: &'a str,
    from_status: &'a str,
    to_status: &'a str,
    actor_id: &'a str,
    note: String,
}

/// Note used when the caller gives none.
#[must_use]
pub fn default_note(from: &str, to: &str) -> String {
    format!("status changed from {from} to {to}")
}

impl ExpensaService {
    /// Append one ledger row. A blank `note` is replaced with
    /// [`default_note`].
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the row cannot be written.
    pub(crate) async fn append_history(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        from_status: &str,
        to_status: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<StatusHistoryEntry, ServiceError> {
        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_note(from_status, to_status), str::to_string);
        let entry = NewHistoryEntry {
            entity_type,
            entity_id,
            from_status,
            to_status,
            actor_id,
            note,
        };
        let created = self
            .store()
            .create(EntityType::StatusHistory, to_object(&entry)?)
            .await?;
        Ok(created.decode()?)
    }

    /// Transitions of one record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the query fails.
    pub async fn list_history(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<StatusHistoryEntry>, ServiceError> {
        let filter = Filter::new()
            .eq("entity_type", entity_type.as_str())
            .eq("entity_id", entity_id)
            .sort_asc("created_at");
        let rows = self.store().filter(EntityType::StatusHistory, &filter).await?;
        rows.iter()
            .map(|r| r.decode().map_err(ServiceError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn blank_note_gets_default() {
        let svc = test_service().await;
        let entry = svc
            .append_history(
                EntityType::FundingRequest,
                "fr-1",
                "draft",
                "pending",
                "usr-1",
                Some("  "),
            )
            .await
            .unwrap();
        assert!(entry.id.starts_with("hst-"));
        assert_eq!(entry.note, "status changed from draft to pending");
    }

    #[tokio::test]
    async fn history_is_scoped_and_oldest_first() {
        let svc = test_service().await;
        svc.append_history(EntityType::FundingRequest, "fr-1", "draft", "pending", "u", None)
            .await
            .unwrap();
        svc.append_history(EntityType::ExpenseReport, "fr-1", "draft", "pending", "u", None)
            .await
            .unwrap();
        svc.append_history(
            EntityType::FundingRequest,
            "fr-1",
            "pending",
            "under_analysis",
            "u",
            Some("picked up"),
        )
        .await
        .unwrap();

        let history = svc
            .list_history(EntityType::FundingRequest, "fr-1")
            .await
            .unwrap();
        let steps: Vec<_> = history
            .iter()
            .map(|h| (h.from_status.as_str(), h.to_status.as_str()))
            .collect();
        assert_eq!(steps, vec![("draft", "pending"), ("pending", "under_analysis")]);
        assert_eq!(history[1].note, "picked up");
    }
}
