//! Shared test utilities for expensa-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;

    use expensa_core::enums::Role;
    use expensa_core::identity::Actor;

    use crate::identity::StaticIdentity;
    use crate::service::{AuditSettings, ExpensaService};
    use crate::store::LibSqlStore;
    use crate::upload::ObjectStoreUploader;

    pub fn requester() -> Actor {
        Actor::new("usr-req", "Ana Souza", "ana@example.gov", Role::Requester)
    }

    pub fn manager() -> Actor {
        Actor::new("usr-mgr", "Bruno Dias", "bruno@example.gov", Role::Manager)
    }

    pub fn admin() -> Actor {
        Actor::new("usr-adm", "Carla Lima", "carla@example.gov", Role::Admin)
    }

    pub fn audit_settings() -> AuditSettings {
        AuditSettings {
            system_actor_id: "system".into(),
            system_email: "system@expensa.test".into(),
            client_host: Some("10.0.0.9".into()),
            user_agent: Some("expensa-tests".into()),
        }
    }

    /// In-memory service whose session resolves to [`requester`].
    pub async fn test_service() -> ExpensaService {
        test_service_with_identity(StaticIdentity::new(requester())).await
    }

    pub async fn test_service_with_identity(identity: StaticIdentity) -> ExpensaService {
        let store = LibSqlStore::open_local(":memory:").await.unwrap();
        ExpensaService::new(
            Arc::new(store),
            Arc::new(ObjectStoreUploader::in_memory("memory://expensa")),
            Arc::new(identity),
            audit_settings(),
        )
    }
}
