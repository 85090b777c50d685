//! Status transition engine.
//!
//! One generic engine drives all three lifecycles; the per-lifecycle
//! transition table and hooks come from [`Lifecycle::transitions`].
//!
//! `change_status` runs load → check → side effects → persist → history →
//! audit. The persist, history, and audit steps are sequenced but not
//! atomic together: a crash in between leaves the new status stored with an
//! incomplete trail. Concurrent changes to one record are not serialized;
//! the last write wins and each appends its own history row.

use std::marker::PhantomData;

use chrono::Utc;
use expensa_core::enums::Role;
use expensa_core::identity::{Actor, ActorProfile};
use expensa_core::snapshot;
use expensa_core::transitions::{Lifecycle, LifecycleStatus, SideEffect};
use serde_json::{Map, Value};

use crate::error::{ServiceError, StoreError};
use crate::helpers::format_timestamp;
use crate::repos::history::default_note;
use crate::service::ExpensaService;

/// A requested move of one record to a new status.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange<'a, S> {
    pub entity_id: &'a str,
    pub target: S,
    pub note: Option<&'a str>,
    pub actor: &'a Actor,
    /// Current requester profile, consulted when a hook captures a snapshot.
    pub profile: Option<&'a ActorProfile>,
}

/// Status engine bound to one lifecycle type.
pub struct StatusEngine<'a, L> {
    svc: &'a ExpensaService,
    _lifecycle: PhantomData<fn() -> L>,
}

impl ExpensaService {
    #[must_use]
    pub const fn status_engine<L: Lifecycle>(&self) -> StatusEngine<'_, L> {
        StatusEngine {
            svc: self,
            _lifecycle: PhantomData,
        }
    }
}

impl<L: Lifecycle> StatusEngine<'_, L> {
    /// Statuses `role` may move a record in `current` to.
    #[must_use]
    pub fn available_transitions(&self, current: L::Status, role: Role) -> &'static [L::Status] {
        L::transitions().available(current, role)
    }

    #[must_use]
    pub fn can_transition_to(&self, current: L::Status, target: L::Status, role: Role) -> bool {
        L::transitions().allows(current, target, role)
    }

    /// Move a record to `change.target`.
    ///
    /// # Errors
    ///
    /// - `Core(NotFound)` if the record does not exist.
    /// - `Core(IllegalTransition)` if the move is not in the table for the
    ///   actor's role. Nothing is written.
    /// - `Store` if persisting the record or its history row fails. The
    ///   audit write never fails this call.
    pub async fn change_status(
        &self,
        change: StatusChange<'_, L::Status>,
    ) -> Result<L, ServiceError> {
        let entity_type = L::ENTITY_TYPE;
        let id = change.entity_id;
        let actor = change.actor;

        let current: L = self.svc.store().get(entity_type, id).await?.decode()?;
        let from = current.status();
        let to = change.target;

        if let Err(e) = L::check_transition(id, from, to, actor.role) {
            tracing::debug!(
                %entity_type,
                id,
                from = from.as_str(),
                to = to.as_str(),
                role = %actor.role,
                "transition rejected"
            );
            return Err(e.into());
        }

        let patch = self.build_patch(from, to, actor, change.profile)?;
        let updated: L = self
            .svc
            .store()
            .update(entity_type, id, patch)
            .await?
            .decode()?;

        let note = change
            .note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_note(from.as_str(), to.as_str()), str::to_string);
        self.svc
            .append_history(
                entity_type,
                id,
                from.as_str(),
                to.as_str(),
                &actor.id,
                Some(&note),
            )
            .await?;

        tracing::info!(
            %entity_type,
            id,
            from = from.as_str(),
            to = to.as_str(),
            actor = %actor.id,
            "status changed"
        );
        self.svc
            .audit_status_change(entity_type, id, from.as_str(), to.as_str(), &note, actor)
            .await;

        Ok(updated)
    }

    /// The new status plus every hook field for this move.
    fn build_patch(
        &self,
        from: L::Status,
        to: L::Status,
        actor: &Actor,
        profile: Option<&ActorProfile>,
    ) -> Result<Map<String, Value>, ServiceError> {
        let mut patch = Map::new();
        patch.insert("status".into(), Value::String(to.as_str().into()));

        let now = format_timestamp(Utc::now());
        for effect in L::transitions().effects(from, to) {
            match effect {
                SideEffect::StampAnalysis => {
                    patch.insert("analysis_date".into(), Value::String(now.clone()));
                    patch.insert("analyst_email".into(), Value::String(actor.email.clone()));
                }
                SideEffect::CaptureSnapshot => {
                    let source = format!("status_change:{from}->{to}");
                    if let Some(snap) = snapshot::capture(profile, &source) {
                        let value = serde_json::to_value(snap).map_err(StoreError::from)?;
                        patch.insert("requester_snapshot".into(), value);
                    }
                }
                SideEffect::StampPayment => {
                    patch.insert("paid_at".into(), Value::String(now.clone()));
                }
            }
        }
        Ok(patch)
    }
}
