//! Shared fixtures for expensa-db integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use expensa_core::enums::{EntityType, Role};
use expensa_core::identity::{Actor, ActorProfile};
use expensa_db::error::{IdentityError, StoreError};
use expensa_db::identity::{IdentityResolver, StaticIdentity};
use expensa_db::service::{AuditSettings, ExpensaService};
use expensa_db::store::{EntityStore, Filter, LibSqlStore, Record};
use expensa_db::upload::ObjectStoreUploader;
use serde_json::{Map, Value};

pub fn requester() -> Actor {
    Actor::new("usr-req", "Ana Souza", "ana@example.gov", Role::Requester)
}

pub fn admin() -> Actor {
    Actor::new("usr-adm", "Carla Lima", "carla@example.gov", Role::Admin)
}

pub fn profile() -> ActorProfile {
    ActorProfile {
        display_name: Some("Ana Souza".into()),
        tax_id: Some("123.456.789-00".into()),
        role_title: Some("Teacher".into()),
        org_unit: Some("Education Office".into()),
        municipality: Some("Campinas".into()),
        ..ActorProfile::default()
    }
}

pub fn audit_settings() -> AuditSettings {
    AuditSettings {
        system_actor_id: "system".into(),
        system_email: "system@prefeitura.example.gov".into(),
        client_host: None,
        user_agent: None,
    }
}

pub fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

pub fn service_with(
    store: Arc<dyn EntityStore>,
    identity: Arc<dyn IdentityResolver>,
) -> ExpensaService {
    ExpensaService::new(
        store,
        Arc::new(ObjectStoreUploader::in_memory("memory://expensa")),
        identity,
        audit_settings(),
    )
}

pub async fn memory_store() -> Arc<LibSqlStore> {
    Arc::new(LibSqlStore::open_local(":memory:").await.unwrap())
}

pub async fn service() -> ExpensaService {
    service_with(memory_store().await, Arc::new(StaticIdentity::new(requester())))
}

/// Identity provider that is always down.
pub struct FailingIdentity;

#[async_trait]
impl IdentityResolver for FailingIdentity {
    async fn current_actor(&self) -> Result<Actor, IdentityError> {
        Err(IdentityError::Provider("identity provider unreachable".into()))
    }
}

/// Store wrapper that rejects every write for one entity type.
pub struct RejectWrites {
    pub inner: Arc<LibSqlStore>,
    pub entity_type: EntityType,
}

impl RejectWrites {
    fn check(&self, entity_type: EntityType) -> Result<(), StoreError> {
        if entity_type == self.entity_type {
            Err(StoreError::Query(format!("{entity_type} writes are disabled")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntityStore for RejectWrites {
    async fn create(
        &self,
        entity_type: EntityType,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.check(entity_type)?;
        self.inner.create(entity_type, fields).await
    }

    async fn get(&self, entity_type: EntityType, id: &str) -> Result<Record, StoreError> {
        self.inner.get(entity_type, id).await
    }

    async fn filter(
        &self,
        entity_type: EntityType,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        self.inner.filter(entity_type, filter).await
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.check(entity_type)?;
        self.inner.update(entity_type, id, patch).await
    }

    async fn delete(&self, entity_type: EntityType, id: &str) -> Result<(), StoreError> {
        self.check(entity_type)?;
        self.inner.delete(entity_type, id).await
    }
}
