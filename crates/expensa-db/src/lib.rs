//! # expensa-db
//!
//! Persistence and workflow services for Expensa.
//!
//! The crate is split along the three collaborators the workflow depends on:
//! an [`EntityStore`](store::EntityStore) for typed documents, an
//! [`UploadDelegate`](upload::UploadDelegate) for binary payloads, and an
//! [`IdentityResolver`](identity::IdentityResolver) for the acting user.
//! [`ExpensaService`](service::ExpensaService) composes them and hosts the
//! audit log, status history, lifecycle repository, status engine, and
//! attachment store as `impl ExpensaService` blocks under [`repos`].
//!
//! The bundled store is a single libSQL document table (`libsql` v0.9.29).

pub mod error;
pub mod helpers;
pub mod identity;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;
pub mod updates;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

use error::StoreError;
use libsql::Builder;

/// libSQL database handle backing [`store::LibSqlStore`].
pub struct ExpensaDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ExpensaDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let expensa_db = Self { db, conn };
        expensa_db.run_migrations().await?;
        Ok(expensa_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"fr-a3f8b2c1d4e5"`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(6)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> ExpensaDb {
        ExpensaDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                ["entities"],
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some(), "entities table should exist");
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("att").await.unwrap();
        assert!(id.starts_with("att-"), "ID should start with 'att-': {id}");
        assert_eq!(id.len(), 16, "3 prefix + 1 dash + 12 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in expensa_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("aud").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }
}
