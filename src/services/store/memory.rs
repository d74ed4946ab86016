//! Map-backed document store.
//!
//! Selected with `STORE_BACKEND=memory`; used for local development and the
//! integration tests. `fail_collection` injects read/write failures so tests
//! can exercise the fail-closed paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, Fields, StoreError, StoredDocument};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `collection` fail until cleared.
    pub fn fail_collection(&self, collection: &str) {
        self.failing.write().unwrap().insert(collection.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.write().unwrap().clear();
    }

    fn check(&self, collection: &str) -> Result<(), StoreError> {
        if self.failing.read().unwrap().contains(collection) {
            return Err(StoreError::Upstream(format!(
                "colección no disponible: {collection}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError> {
        self.check(collection)?;
        Ok(self
            .collections
            .read()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check(collection)?;
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check(collection)?;
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let doc = docs.entry(id.to_string()).or_default();
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check(collection)?;
        let mut collections = self.collections.write().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(StoreError::NotFound)?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.check(collection)?;
        Ok(self
            .collections
            .read()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| StoredDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let documents = self.list(collection).await?;
        Ok(documents
            .into_iter()
            .filter(|doc| doc.fields.get(field) == Some(value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", fields(json!({"email": "a@x.com"})))
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.get("email"), Some(&json!("a@x.com")));
        assert!(store.get("users", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_keeps_other_fields() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", fields(json!({"email": "a@x.com", "role": "estudiante"})))
            .await
            .unwrap();
        store
            .merge("users", "u1", fields(json!({"displayName": "Ana"})))
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.get("role"), Some(&json!("estudiante")));
        assert_eq!(doc.get("displayName"), Some(&json!("Ana")));
    }

    #[tokio::test]
    async fn test_update_requires_existing_document() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update("users", "missing", fields(json!({"displayName": "Ana"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_query_eq_filters() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", fields(json!({"role": "estudiante"})))
            .await
            .unwrap();
        store
            .set("users", "u2", fields(json!({"role": "maestro"})))
            .await
            .unwrap();

        let students = store
            .query_eq("users", "role", &json!("estudiante"))
            .await
            .unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "u1");
    }

    #[tokio::test]
    async fn test_fail_collection_injects_errors() {
        let store = MemoryDocumentStore::new();
        store.fail_collection("users");
        assert!(store.get("users", "u1").await.is_err());
        store.clear_failures();
        assert!(store.get("users", "u1").await.is_ok());
    }
}
