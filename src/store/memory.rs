use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::store::path::validate_id;
use crate::store::{Document, DocumentStore, Fields, StoreError, TreePath};

type Collection = BTreeMap<String, Map<String, Value>>;

/// In-process document store keyed by collection path
///
/// Used by the test-suite and by `STORE_BACKEND=memory` for local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across every collection
    pub async fn document_count(&self) -> usize {
        let collections = self.collections.read().await;
        collections.values().map(BTreeMap::len).sum()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_one(&self, path: &TreePath, id: &str) -> Result<Document, StoreError> {
        validate_id(id)?;
        let collections = self.collections.read().await;
        collections
            .get(path.as_str())
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone()))
            .ok_or_else(|| StoreError::not_found(path, id))
    }

    async fn get_all_children(&self, path: &TreePath) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path.as_str())
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_document(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        validate_id(id)?;
        let values = fields.resolve(Utc::now());
        let mut collections = self.collections.write().await;
        collections
            .entry(path.as_str().to_string())
            .or_default()
            .insert(id.to_string(), values);
        Ok(())
    }

    async fn update_fields(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        validate_id(id)?;
        let values = fields.resolve(Utc::now());
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(path.as_str())
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(path, id))?;
        existing.extend(values);
        Ok(())
    }

    async fn delete_one(&self, path: &TreePath, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(path.as_str()) {
            docs.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_requires_existing_document() {
        let store = MemoryStore::new();
        let path = TreePath::classes();
        let err = store
            .update_fields(&path, "6e", Fields::new().set("nom", "6e"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let path = TreePath::classes().child("6e", "matieres").unwrap();
        store
            .set_document(&path, "maths", Fields::new().set("nom", "Maths").set("icon", "aaa"))
            .await
            .unwrap();
        store
            .update_fields(&path, "maths", Fields::new().set("nom", "Mathématiques"))
            .await
            .unwrap();

        let doc = store.get_one(&path, "maths").await.unwrap();
        assert_eq!(doc.get("nom"), Some(&json!("Mathématiques")));
        assert_eq!(doc.get("icon"), Some(&json!("aaa")));
    }

    #[tokio::test]
    async fn set_replaces_whole_document() {
        let store = MemoryStore::new();
        let path = TreePath::classes();
        store
            .set_document(&path, "6e", Fields::new().set("nom", "6e").set("extra", 1))
            .await
            .unwrap();
        store
            .set_document(&path, "6e", Fields::new().set("nom", "Sixième"))
            .await
            .unwrap();
        let doc = store.get_one(&path, "6e").await.unwrap();
        assert!(doc.get("extra").is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let path = TreePath::classes();
        store.delete_one(&path, "ghost").await.unwrap();
        store
            .set_document(&path, "6e", Fields::new().set("nom", "6e"))
            .await
            .unwrap();
        store.delete_one(&path, "6e").await.unwrap();
        store.delete_one(&path, "6e").await.unwrap();
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn delete_leaves_sub_collections() {
        let store = MemoryStore::new();
        let classes = TreePath::classes();
        let matieres = classes.child("6e", "matieres").unwrap();
        store
            .set_document(&classes, "6e", Fields::new().set("nom", "6e"))
            .await
            .unwrap();
        store
            .set_document(&matieres, "maths", Fields::new().set("nom", "Maths"))
            .await
            .unwrap();

        store.delete_one(&classes, "6e").await.unwrap();
        assert!(store.get_one(&matieres, "maths").await.is_ok());
    }
}
