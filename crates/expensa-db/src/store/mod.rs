//! Generic entity store.
//!
//! Every entity is a flat JSON document keyed by an [`EntityType`] and an id.
//! The store owns `id`, `created_at`, and `updated_at`; everything else is
//! caller data. Services above decode documents into typed entities with
//! [`Record::decode`].

mod libsql_store;

pub use libsql_store::LibSqlStore;

use async_trait::async_trait;
use expensa_core::enums::EntityType;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::helpers::{decode, validate_field_name};

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity_type: EntityType,
    pub id: String,
    /// Full document including the store-owned keys.
    pub data: Map<String, Value>,
}

impl Record {
    /// Decode the document into a typed entity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the document does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        decode(&self.data)
    }
}

/// Sort order for [`Filter`]. Ties are broken by insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    /// Parse `field` (ascending) or `-field` (descending).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Query` if the field name is invalid.
    pub fn parse(key: &str) -> Result<Self, StoreError> {
        let (field, descending) = key
            .strip_prefix('-')
            .map_or((key, false), |rest| (rest, true));
        validate_field_name(field)?;
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

/// Equality predicates, sort key, and limit for [`EntityStore::filter`].
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub predicates: Vec<(String, Value)>,
    pub sort: Option<SortKey>,
    pub limit: Option<u32>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Match rows whose top-level `field` equals `value`. `Value::Null`
    /// matches missing and null fields alike.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((field.into(), value.into()));
        self
    }

    #[must_use]
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortKey {
            field: field.into(),
            descending: false,
        });
        self
    }

    #[must_use]
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortKey {
            field: field.into(),
            descending: true,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Document storage keyed by entity type.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// behind an `Arc` by every service.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a new document. Store-owned keys in `fields` are ignored.
    async fn create(
        &self,
        entity_type: EntityType,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError>;

    /// Fetch one document.
    ///
    /// Returns `Err(StoreError::NotFound)` if no row of this type has the id.
    async fn get(&self, entity_type: EntityType, id: &str) -> Result<Record, StoreError>;

    async fn filter(
        &self,
        entity_type: EntityType,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError>;

    /// Shallow-merge `patch` into the stored document. No version check is
    /// made; the last write wins.
    async fn update(
        &self,
        entity_type: EntityType,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Record, StoreError>;

    /// Physically remove a document.
    async fn delete(&self, entity_type: EntityType, id: &str) -> Result<(), StoreError>;

    /// Insert several documents in order.
    async fn bulk_create(
        &self,
        entity_type: EntityType,
        items: Vec<Map<String, Value>>,
    ) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::with_capacity(items.len());
        for fields in items {
            records.push(self.create(entity_type, fields).await?);
        }
        Ok(records)
    }
}
