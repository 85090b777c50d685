//! Error types for expensa-db.
//!
//! `StoreError`, `UploadError`, and `IdentityError` describe failures of the
//! three collaborators the services sit on. `ServiceError` is what service
//! operations return; it folds a store-level not-found into
//! `CoreError::NotFound` so callers match a single taxonomy.

use expensa_core::errors::CoreError;
use thiserror::Error;

/// Errors from entity store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with this id exists for the entity type.
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A query could not be built or its result could not be read.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A stored document does not match the requested type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Errors from the binary upload delegate.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The delegate refused the payload.
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// The object store failed.
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Errors from the identity resolver.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("No active session")]
    NoSession,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Errors surfaced by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Not found, illegal transition, or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The acting role may not perform this operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The upload delegate failed; nothing was created or mutated.
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    /// The entity store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity_type, id } => {
                Self::Core(CoreError::NotFound { entity_type, id })
            }
            other => Self::Store(other),
        }
    }
}

impl ServiceError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Core(CoreError::NotFound { .. }))
    }

    #[must_use]
    pub const fn is_illegal_transition(&self) -> bool {
        matches!(self, Self::Core(CoreError::IllegalTransition { .. }))
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(msg.into()))
    }
}
