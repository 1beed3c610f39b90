// PostgreSQL document store
//
// Documents live in a single `event_documents` table with a JSONB body.
// The etag is a per-row version counter bumped on every write, which gives
// conditional replace without row locks.

use async_trait::async_trait;
use rollcall_core::store::{document_id, Document, DocumentStore, StoreError};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of DocumentStore
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then apply pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply pending migrations from `migrations/`
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn format_etag(version: i64) -> String {
    format!("\"{version}\"")
}

fn parse_etag(etag: &str) -> Option<i64> {
    etag.trim_matches('"').parse().ok()
}

fn transport(op: &str, e: sqlx::Error) -> StoreError {
    error!("Failed to {}: {}", op, e);
    StoreError::Transport(e.to_string())
}

fn row_to_document(row: PgRow) -> Document {
    Document {
        id: row.get("id"),
        partition_key: row.get("partition_key"),
        body: row.get("body"),
        etag: format_etag(row.get("etag")),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self, body))]
    async fn create_document(&self, body: Value) -> Result<Document, StoreError> {
        let id = document_id(&body)?.to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO event_documents (id, partition_key, body)
            VALUES ($1, $1, $2)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, partition_key, body, etag
            "#,
        )
        .bind(&id)
        .bind(&body)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| transport("create document", e))?
        .ok_or(StoreError::AlreadyExists(id.clone()))?;

        debug!(%id, "created document");
        Ok(row_to_document(row))
    }

    #[instrument(skip(self))]
    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Document, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, partition_key, body, etag
            FROM event_documents
            WHERE id = $1 AND partition_key = $2
            "#,
        )
        .bind(id)
        .bind(partition_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| transport("read document", e))?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        Ok(row_to_document(row))
    }

    #[instrument(skip(self))]
    async fn query_all_documents(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, partition_key, body, etag
            FROM event_documents
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| transport("query documents", e))?;

        Ok(rows.into_iter().map(row_to_document).collect())
    }

    #[instrument(skip(self, body))]
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

        let expected_version = match if_match {
            Some(etag) => Some(parse_etag(etag).ok_or_else(|| StoreError::PreconditionFailed {
                id: id.to_string(),
                expected: etag.to_string(),
            })?),
            None => None,
        };

        let row = sqlx::query(
            r#"
            UPDATE event_documents
            SET body = $2, etag = etag + 1, updated_at = NOW()
            WHERE id = $1 AND ($3::BIGINT IS NULL OR etag = $3)
            RETURNING id, partition_key, body, etag
            "#,
        )
        .bind(id)
        .bind(&body)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| transport("replace document", e))?;

        if let Some(row) = row {
            debug!(%id, "replaced document");
            return Ok(row_to_document(row));
        }

        // Nothing updated: either the row is gone or the etag moved on
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM event_documents WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| transport("check document", e))?;

        match (exists, if_match) {
            (true, Some(expected)) => Err(StoreError::PreconditionFailed {
                id: id.to_string(),
                expected: expected.to_string(),
            }),
            _ => Err(StoreError::NotFound(id.to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<(), StoreError> {
        let result =
            sqlx::query("DELETE FROM event_documents WHERE id = $1 AND partition_key = $2")
                .bind(id)
                .bind(partition_key)
                .execute(&self.pool)
                .await
                .map_err(|e| transport("delete document", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(%id, "deleted document");
        Ok(())
    }
}
