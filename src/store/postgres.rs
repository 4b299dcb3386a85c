use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::time::Duration;
use tracing::{debug, info};

use crate::store::path::validate_id;
use crate::store::{Document, DocumentStore, Fields, StoreError, TreePath};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    fields JSONB NOT NULL DEFAULT '{}'::jsonb,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (collection, id)
)";

// Object of `{ key: now() }` for every key in $4, merged over the payload in $3
const STAMPED_FIELDS: &str = "($3::jsonb || (SELECT COALESCE(jsonb_object_agg(k, to_jsonb(now())), '{}'::jsonb) \
                                FROM unnest($4::text[]) AS k))";

/// Document store backed by a single Postgres JSONB table
///
/// Server timestamps are resolved with the database clock (`now()`).
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the documents table exists
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
        connection_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connection_timeout)
            .connect(connection_string)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!("Connected Postgres document store");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    fn split(fields: Fields) -> (Json<Value>, Vec<String>) {
        let stamps = fields.server_timestamps().map(str::to_string).collect();
        (Json(Value::Object(fields.values().clone())), stamps)
    }
}

fn into_document(id: String, fields: Json<Value>) -> Document {
    match fields.0 {
        Value::Object(map) => Document::new(id, map),
        _ => Document::new(id, Map::new()),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_one(&self, path: &TreePath, id: &str) -> Result<Document, StoreError> {
        validate_id(id)?;
        let row: Option<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, fields FROM documents WHERE collection = $1 AND id = $2")
                .bind(path.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, fields)| into_document(id, fields))
            .ok_or_else(|| StoreError::not_found(path, id))
    }

    async fn get_all_children(&self, path: &TreePath) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, fields FROM documents WHERE collection = $1")
                .bind(path.as_str())
                .fetch_all(&self.pool)
                .await?;

        debug!("Loaded {} documents from {}", rows.len(), path);
        Ok(rows
            .into_iter()
            .map(|(id, fields)| into_document(id, fields))
            .collect())
    }

    async fn set_document(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        validate_id(id)?;
        let (values, stamps) = Self::split(fields);
        let sql = format!(
            "INSERT INTO documents (collection, id, fields, updated_at)
             VALUES ($1, $2, {}, now())
             ON CONFLICT (collection, id) DO UPDATE SET fields = EXCLUDED.fields, updated_at = now()",
            STAMPED_FIELDS
        );
        sqlx::query(&sql)
            .bind(path.as_str())
            .bind(id)
            .bind(values)
            .bind(stamps)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_fields(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        validate_id(id)?;
        let (values, stamps) = Self::split(fields);
        let sql = format!(
            "UPDATE documents SET fields = fields || {}, updated_at = now()
             WHERE collection = $1 AND id = $2",
            STAMPED_FIELDS
        );
        let result = sqlx::query(&sql)
            .bind(path.as_str())
            .bind(id)
            .bind(values)
            .bind(stamps)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(path, id));
        }
        Ok(())
    }

    async fn delete_one(&self, path: &TreePath, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(path.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
