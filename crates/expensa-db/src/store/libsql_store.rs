use async_trait::async_trait;
use chrono::Utc;
use expensa_core::enums::EntityType;
use expensa_core::ids::prefix_for;
use serde_json::{Map, Value};

use super::{EntityStore, Filter, Record};
use crate::ExpensaDb;
use crate::error::StoreError;
use crate::helpers::{RESERVED_KEYS, format_timestamp, validate_field_name};

/// [`EntityStore`] over the libSQL `entities` document table.
pub struct LibSqlStore {
    db: ExpensaDb,
}

impl LibSqlStore {
    #[must_use]
    pub const fn new(db: ExpensaDb) -> Self {
        Self { db }
    }

    /// Open (and migrate) a local database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(ExpensaDb::open_local(path).await?))
    }

    #[must_use]
    pub const fn db(&self) -> &ExpensaDb {
        &self.db
    }

    async fn write_document(
        &self,
        entity_type: EntityType,
        id: &str,
        data: &Map<String, Value>,
        updated_at: &str,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(data)?;
        let changed = self
            .db
            .conn()
            .execute(
                "UPDATE entities SET data = ?1, updated_at = ?2 WHERE id = ?3 AND entity_type = ?4",
                libsql::params![json, updated_at, id, entity_type.as_str()],
            )
            .await?;
        if changed == 0 {
            return Err(not_found(entity_type, id));
        }
        Ok(())
    }
}

fn not_found(entity_type: EntityType, id: &str) -> StoreError {
    StoreError::NotFound {
        entity_type: entity_type.as_str().to_string(),
        id: id.to_string(),
    }
}

fn parse_document(raw: &str) -> Result<Map<String, Value>, StoreError> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "stored document is not an object: {other}"
        ))),
    }
}

fn to_record(entity_type: EntityType, data: Map<String, Value>) -> Result<Record, StoreError> {
    let id = data
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Serialization("stored document has no id".into()))?
        .to_string();
    Ok(Record {
        entity_type,
        id,
        data,
    })
}

/// Bind a JSON scalar for comparison against `json_extract`, which yields
/// SQL NULL for null/missing and 1/0 for booleans.
fn predicate_sql(
    field: &str,
    value: &Value,
    params: &mut Vec<libsql::Value>,
) -> Result<String, StoreError> {
    validate_field_name(field)?;
    let column = format!("json_extract(data, '$.{field}')");
    let bound = match value {
        Value::Null => return Ok(format!("{column} IS NULL")),
        Value::Bool(b) => libsql::Value::Integer(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => libsql::Value::Integer(i),
            (None, Some(f)) => libsql::Value::Real(f),
            (None, None) => {
                return Err(StoreError::Query(format!("unsupported number for '{field}'")));
            }
        },
        Value::String(s) => libsql::Value::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            return Err(StoreError::Query(format!(
                "predicate on '{field}' must be a scalar"
            )));
        }
    };
    params.push(bound);
    Ok(format!("{column} = ?{}", params.len()))
}

#[async_trait]
impl EntityStore for LibSqlStore {
    async fn create(
        &self,
        entity_type: EntityType,
        mut fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let id = self.db.generate_id(prefix_for(entity_type)).await?;
        let now = format_timestamp(Utc::now());

        for key in RESERVED_KEYS {
            fields.remove(*key);
        }
        fields.insert("id".into(), Value::String(id.clone()));
        fields.insert("created_at".into(), Value::String(now.clone()));
        fields.insert("updated_at".into(), Value::String(now.clone()));

        let json = serde_json::to_string(&fields)?;
        self.db
            .conn()
            .execute(
                "INSERT INTO entities (id, entity_type, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    entity_type.as_str(),
                    json,
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;

        Ok(Record {
            entity_type,
            id,
            data: fields,
        })
    }

    async fn get(&self, entity_type: EntityType, id: &str) -> Result<Record, StoreError> {
        let mut rows = self
            .db
            .conn()
            .query(
                "SELECT data FROM entities WHERE entity_type = ?1 AND id = ?2",
                libsql::params![entity_type.as_str(), id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| not_found(entity_type, id))?;
        to_record(entity_type, parse_document(&row.get::<String>(0)?)?)
    }

    async fn filter(
        &self,
        entity_type: EntityType,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let mut params: Vec<libsql::Value> =
            vec![libsql::Value::Text(entity_type.as_str().to_string())];
        let mut conditions = vec!["entity_type = ?1".to_string()];
        for (field, value) in &filter.predicates {
            conditions.push(predicate_sql(field, value, &mut params)?);
        }

        // Ties fall back to insertion order, reversed for descending sorts so
        // "newest first" stays stable within one timestamp.
        let order_by = match &filter.sort {
            Some(key) => {
                validate_field_name(&key.field)?;
                let dir = if key.descending { "DESC" } else { "ASC" };
                format!("json_extract(data, '$.{}') {dir}, seq {dir}", key.field)
            }
            None => "seq ASC".to_string(),
        };
        let limit_clause = filter
            .limit
            .map_or_else(String::new, |limit| format!(" LIMIT {limit}"));

        let sql = format!(
            "SELECT data FROM entities WHERE {} ORDER BY {order_by}{limit_clause}",
            conditions.join(" AND ")
        );

        let mut rows = self
            .db
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(to_record(
                entity_type,
                parse_document(&row.get::<String>(0)?)?,
            )?);
        }
        Ok(records)
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let mut record = self.get(entity_type, id).await?;
        let now = format_timestamp(Utc::now());

        for (key, value) in patch {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                record.data.insert(key, value);
            }
        }
        record
            .data
            .insert("updated_at".into(), Value::String(now.clone()));

        self.write_document(entity_type, id, &record.data, &now)
            .await?;
        Ok(record)
    }

    async fn delete(&self, entity_type: EntityType, id: &str) -> Result<(), StoreError> {
        let changed = self
            .db
            .conn()
            .execute(
                "DELETE FROM entities WHERE entity_type = ?1 AND id = ?2",
                libsql::params![entity_type.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(not_found(entity_type, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn test_store() -> LibSqlStore {
        LibSqlStore::open_local(":memory:").await.unwrap()
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_stamps_store_owned_keys() {
        let store = test_store().await;
        let rec = store
            .create(
                EntityType::FundingRequest,
                obj(json!({"id": "caller-id", "title": "Trip"})),
            )
            .await
            .unwrap();

        assert!(rec.id.starts_with("fr-"));
        assert_eq!(rec.data["id"], json!(rec.id));
        assert!(rec.data.contains_key("created_at"));
        assert_eq!(rec.data["created_at"], rec.data["updated_at"]);

        let fetched = store.get(EntityType::FundingRequest, &rec.id).await.unwrap();
        assert_eq!(fetched, rec);
    }

    #[tokio::test]
    async fn get_is_scoped_by_entity_type() {
        let store = test_store().await;
        let rec = store
            .create(EntityType::Attachment, obj(json!({"original_name": "a.pdf"})))
            .await
            .unwrap();

        let err = store.get(EntityType::AuditLog, &rec.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn filter_matches_null_and_bool() {
        let store = test_store().await;
        store
            .create(
                EntityType::Attachment,
                obj(json!({"owner_id": "fr-1", "visible_to_submitter": true, "description": null})),
            )
            .await
            .unwrap();
        store
            .create(
                EntityType::Attachment,
                obj(json!({"owner_id": "fr-1", "visible_to_submitter": false, "description": "x"})),
            )
            .await
            .unwrap();
        store
            .create(EntityType::Attachment, obj(json!({"owner_id": "fr-2"})))
            .await
            .unwrap();

        let hidden = store
            .filter(
                EntityType::Attachment,
                &Filter::new().eq("owner_id", "fr-1").eq("visible_to_submitter", false),
            )
            .await
            .unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].data["description"], json!("x"));

        let no_description = store
            .filter(EntityType::Attachment, &Filter::new().eq("description", Value::Null))
            .await
            .unwrap();
        assert_eq!(no_description.len(), 2);
    }

    #[tokio::test]
    async fn filter_sorts_with_insertion_tie_break() {
        let store = test_store().await;
        let items = vec![
            obj(json!({"rank": 1, "name": "first"})),
            obj(json!({"rank": 2, "name": "second"})),
            obj(json!({"rank": 1, "name": "third"})),
        ];
        store.bulk_create(EntityType::ExpenseItem, items).await.unwrap();

        let asc = store
            .filter(EntityType::ExpenseItem, &Filter::new().sort_asc("rank"))
            .await
            .unwrap();
        let names: Vec<_> = asc.iter().map(|r| r.data["name"].clone()).collect();
        assert_eq!(names, vec![json!("first"), json!("third"), json!("second")]);

        let desc = store
            .filter(
                EntityType::ExpenseItem,
                &Filter::new().sort_desc("rank").limit(2),
            )
            .await
            .unwrap();
        let names: Vec<_> = desc.iter().map(|r| r.data["name"].clone()).collect();
        assert_eq!(names, vec![json!("second"), json!("third")]);
    }

    #[tokio::test]
    async fn filter_rejects_bad_field_names() {
        let store = test_store().await;
        let err = store
            .filter(EntityType::AuditLog, &Filter::new().eq("a') OR ('1", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn update_is_shallow_merge() {
        let store = test_store().await;
        let rec = store
            .create(
                EntityType::ExpenseReport,
                obj(json!({"title": "Old", "notes": "keep", "nested": {"a": 1, "b": 2}})),
            )
            .await
            .unwrap();

        let updated = store
            .update(
                EntityType::ExpenseReport,
                &rec.id,
                obj(json!({"title": "New", "nested": {"a": 3}, "created_at": "ignored"})),
            )
            .await
            .unwrap();

        assert_eq!(updated.data["title"], json!("New"));
        assert_eq!(updated.data["notes"], json!("keep"));
        assert_eq!(updated.data["nested"], json!({"a": 3}));
        assert_eq!(updated.data["created_at"], rec.data["created_at"]);

        let fetched = store.get(EntityType::ExpenseReport, &rec.id).await.unwrap();
        assert_eq!(fetched.data, updated.data);
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows() {
        let store = test_store().await;
        let err = store
            .update(EntityType::FundingRequest, "fr-missing", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store
            .delete(EntityType::FundingRequest, "fr-missing")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = test_store().await;
        let rec = store
            .create(EntityType::ExpenseItem, obj(json!({"name": "x"})))
            .await
            .unwrap();
        store.delete(EntityType::ExpenseItem, &rec.id).await.unwrap();
        assert!(store.get(EntityType::ExpenseItem, &rec.id).await.is_err());
    }
}
