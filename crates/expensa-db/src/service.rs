//! Service layer composing the store, upload delegate, and identity resolver.
//!
//! `ExpensaService` holds the three collaborators behind `Arc<dyn _>` so
//! tests can swap in failing wrappers. All workflow operations are
//! implemented as `impl ExpensaService` blocks under [`crate::repos`].
//!
//! Every mutating operation follows the same shape:
//! 1. Load and validate
//! 2. Write the primary row
//! 3. Append history (status changes only)
//! 4. Record audit (never fails the caller)
//!
//! Steps are sequenced but not atomic together.

use std::sync::Arc;

use expensa_config::{AuditConfig, ExpensaConfig};

use crate::error::{StoreError, UploadError};
use crate::identity::IdentityResolver;
use crate::store::{EntityStore, LibSqlStore};
use crate::upload::{ObjectStoreUploader, UploadDelegate};

/// Fallback identity and environment metadata for audit entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSettings {
    pub system_actor_id: String,
    pub system_email: String,
    pub client_host: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self::from(&AuditConfig::default())
    }
}

impl From<&AuditConfig> for AuditSettings {
    fn from(config: &AuditConfig) -> Self {
        Self {
            system_actor_id: config.system_actor_id.clone(),
            system_email: config.system_email(),
            client_host: config.client_host.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Errors raised while assembling a service from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub struct ExpensaService {
    store: Arc<dyn EntityStore>,
    uploads: Arc<dyn UploadDelegate>,
    identity: Arc<dyn IdentityResolver>,
    audit: AuditSettings,
}

impl ExpensaService {
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        uploads: Arc<dyn UploadDelegate>,
        identity: Arc<dyn IdentityResolver>,
        audit: AuditSettings,
    ) -> Self {
        Self {
            store,
            uploads,
            identity,
            audit,
        }
    }

    /// Open the configured libSQL database and upload backend.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the database or upload backend cannot be opened.
    pub async fn from_config(
        config: &ExpensaConfig,
        identity: Arc<dyn IdentityResolver>,
    ) -> Result<Self, SetupError> {
        if !config.database.is_in_memory() {
            let parent = std::path::Path::new(&config.database.path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty());
            if let Some(parent) = parent {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Query(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let store = LibSqlStore::open_local(&config.database.path).await?;
        let uploads = ObjectStoreUploader::from_config(&config.uploads)?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(uploads),
            identity,
            AuditSettings::from(&config.audit),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn uploads(&self) -> &dyn UploadDelegate {
        self.uploads.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityResolver {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn audit_settings(&self) -> &AuditSettings {
        &self.audit
    }
}
