// Document store contract
//
// The service layer talks to storage only through this trait. Documents are
// schemaless JSON bodies addressed by (id, partition_key); in this service the
// partition key is always the document's own id.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Error type for store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No document with this id in the addressed partition
    #[error("document not found: {0}")]
    NotFound(String),

    /// A document with this id already exists
    #[error("document already exists: {0}")]
    AlreadyExists(String),

    /// Conditional replace lost against another writer
    #[error("etag mismatch on {id}: expected {expected}")]
    PreconditionFailed { id: String, expected: String },

    /// Backend communication failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Body could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored document together with its version stamp
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub partition_key: String,
    pub body: Value,
    /// Opaque version stamp, changes on every write
    pub etag: String,
}

impl Document {
    /// Decode the body into a typed value
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Encode a typed value into a document body
pub fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Read the `id` field every document body must carry
pub fn document_id(body: &Value) -> Result<&str, StoreError> {
    body.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Serialization("document body has no string `id`".to_string()))
}

/// Trait for a document collection partitioned by document id
///
/// Implementations:
/// - `InMemoryDocumentStore` for development and tests
/// - `PostgresDocumentStore` for production
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name reported by the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Insert a new document. The id is read from the body.
    async fn create_document(&self, body: Value) -> Result<Document, StoreError>;

    /// Point read by id within a partition
    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Document, StoreError>;

    /// Cross-partition scan returning every document, in backend-defined order
    async fn query_all_documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Overwrite the document at `id`.
    ///
    /// With `if_match`, the write only succeeds when the stored etag still
    /// equals it; otherwise `PreconditionFailed` is returned and nothing is
    /// written.
    async fn replace_document(
        &self,
        id: &str,
        body: Value,
        if_match: Option<&str>,
    ) -> Result<Document, StoreError>;

    /// Remove a document
    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<(), StoreError>;
}
