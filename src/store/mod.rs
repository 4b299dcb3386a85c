// Tree Store Client: path-addressed document primitives
//
// Every repository is built on the five primitives of `DocumentStore`.
// No call spans more than one primitive atomically.

pub mod document;
pub mod manager;
pub mod memory;
pub mod path;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use document::{Document, Fields};
pub use manager::open_store;
pub use memory::MemoryStore;
pub use path::{ChapitreRef, LeconRef, MatiereRef, ModuleRef, TreePath};
pub use postgres::PgDocumentStore;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {path}/{id}")]
    NotFound { path: String, id: String },

    #[error("Invalid document key: {0:?}")]
    InvalidPath(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(path: &TreePath, id: &str) -> Self {
        StoreError::NotFound {
            path: path.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document; `NotFound` when absent
    async fn get_one(&self, path: &TreePath, id: &str) -> Result<Document, StoreError>;

    /// All documents of a collection, in no guaranteed order
    async fn get_all_children(&self, path: &TreePath) -> Result<Vec<Document>, StoreError>;

    /// Create or fully replace a document
    async fn set_document(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge top-level fields into an existing document; `NotFound` when absent
    async fn update_fields(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove a document; succeeds when already absent. Sub-collections are left in place.
    async fn delete_one(&self, path: &TreePath, id: &str) -> Result<(), StoreError>;

    /// Key for documents whose id is assigned by the store
    fn new_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
