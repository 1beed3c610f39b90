// In-memory document store for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: Etags come from a single counter, so every write gets a fresh one
//
// Behaves like the PostgreSQL store: documents addressed by (id, partition key),
// create fails on existing ids, conditional replace compares etags.

use async_trait::async_trait;
use parking_lot::RwLock;
use rollcall_core::store::{document_id, Document, DocumentStore, StoreError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory document collection.
/// All data is stored in memory and lost on restart.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
    etag_counter: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn next_etag(&self) -> String {
        let n = self.etag_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("\"{n:016x}\"")
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_document(&self, body: Value) -> Result<Document, StoreError> {
        let id = document_id(&body)?.to_string();
        let mut documents = self.documents.write();
        if documents.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let doc = Document {
            id: id.clone(),
            partition_key: id.clone(),
            body,
            etag: self.next_etag(),
        };
        documents.insert(id, doc.clone());
        Ok(doc)
    }

    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Document, StoreError> {
        self.documents
            .read()
            .get(id)
            .filter(|d| d.partition_key == partition_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn query_all_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.read().values().cloned().collect())
    }

    async fn replace_document(
        &self,
        id: &str,
        body: Value,
        if_match: Option<&str>,
    ) -> Result<Document, StoreError> {
        if document_id(&body)? != id {
            return Err(StoreError::Serialization(format!(
                "body id does not match document {id}"
            )));
        }
        let mut documents = self.documents.write();
        let doc = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(expected) = if_match {
            if doc.etag != expected {
                return Err(StoreError::PreconditionFailed {
                    id: id.to_string(),
                    expected: expected.to_string(),
                });
            }
        }
        doc.body = body;
        doc.etag = self.next_etag();
        Ok(doc.clone())
    }

    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        match documents.get(id) {
            Some(doc) if doc.partition_key == partition_key => {
                documents.remove(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_read() {
        let store = InMemoryDocumentStore::new();
        let created = store
            .create_document(json!({"id": "e1", "name": "Meetup"}))
            .await
            .unwrap();
        assert_eq!(created.partition_key, "e1");

        let read = store.read_document("e1", "e1").await.unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = InMemoryDocumentStore::new();
        store.create_document(json!({"id": "e1"})).await.unwrap();
        let err = store.create_document(json!({"id": "e1"})).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(id) if id == "e1"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_read_wrong_partition_is_not_found() {
        let store = InMemoryDocumentStore::new();
        store.create_document(json!({"id": "e1"})).await.unwrap();
        assert!(matches!(
            store.read_document("e1", "e2").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_conditional_replace() {
        let store = InMemoryDocumentStore::new();
        let v1 = store.create_document(json!({"id": "e1", "n": 1})).await.unwrap();

        let v2 = store
            .replace_document("e1", json!({"id": "e1", "n": 2}), Some(&v1.etag))
            .await
            .unwrap();
        assert_ne!(v1.etag, v2.etag);

        // Stale etag loses
        let err = store
            .replace_document("e1", json!({"id": "e1", "n": 3}), Some(&v1.etag))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed { .. }));
        assert_eq!(store.read_document("e1", "e1").await.unwrap().body["n"], 2);

        // Unconditional replace always wins
        store
            .replace_document("e1", json!({"id": "e1", "n": 4}), None)
            .await
            .unwrap();
        assert_eq!(store.read_document("e1", "e1").await.unwrap().body["n"], 4);
    }

    #[tokio::test]
    async fn test_replace_missing_document() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(
            store.replace_document("e1", json!({"id": "e1"}), None).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_with_mismatched_body_id() {
        let store = InMemoryDocumentStore::new();
        store.create_document(json!({"id": "e1"})).await.unwrap();
        assert!(matches!(
            store.replace_document("e1", json!({"id": "e2"}), None).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryDocumentStore::new();
        store.create_document(json!({"id": "e1"})).await.unwrap();
        store.delete_document("e1", "e1").await.unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.delete_document("e1", "e1").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_query_all() {
        let store = InMemoryDocumentStore::new();
        for id in ["a", "b", "c"] {
            store.create_document(json!({"id": id})).await.unwrap();
        }
        let mut ids: Vec<_> = store
            .query_all_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
