// Entity repositories
//
// One repository per tree level, each built on the `DocumentStore`
// primitives through `Collection<T>`. Failures are logged with context and
// returned; only the Propagator swallows (and logs) its own errors.

pub mod cascade;
pub mod chapitre;
pub mod classe;
pub mod exercice;
pub mod exercice_video;
pub mod lecon;
pub mod matiere;
pub mod module;
pub mod propagator;
pub mod question;
pub mod sujet;

use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::links::LinkError;
use crate::store::{Document, DocumentStore, Fields, StoreError, TreePath};
use crate::types::NodeKind;

pub use cascade::Cascade;
pub use chapitre::ChapitreRepository;
pub use classe::ClasseRepository;
pub use exercice::ExerciceRepository;
pub use exercice_video::ExerciceVideoRepository;
pub use lecon::LeconRepository;
pub use matiere::MatiereRepository;
pub use module::ModuleRepository;
pub use propagator::Propagator;
pub use question::QuestionRepository;
pub use sujet::SujetRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed {kind} document {id}: {message}")]
    Malformed {
        kind: NodeKind,
        id: String,
        message: String,
    },

    #[error("External service error: {0}")]
    ExternalService(#[from] LinkError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPath(id) => {
                RepositoryError::Validation(format!("invalid document key {:?}", id))
            }
            other => RepositoryError::Store(other),
        }
    }
}

impl RepositoryError {
    fn from_store(kind: NodeKind, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => RepositoryError::NotFound { kind, id },
            other => other.into(),
        }
    }
}

/// Typed view of one collection level
///
/// Thin layer over the store primitives: decodes documents into `T`,
/// attaches the entity kind to errors and logs every failure.
pub(crate) struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    kind: NodeKind,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            kind: self.kind,
            _phantom: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, kind: NodeKind) -> Self {
        Self {
            store,
            kind,
            _phantom: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn decode(&self, doc: &Document) -> Result<T, RepositoryError> {
        doc.decode().map_err(|e| {
            error!("Malformed {} document {}: {}", self.kind, doc.id, e);
            RepositoryError::Malformed {
                kind: self.kind,
                id: doc.id.clone(),
                message: e.to_string(),
            }
        })
    }

    fn fail(&self, action: &str, path: &TreePath, id: &str, err: StoreError) -> RepositoryError {
        error!("Failed to {} {} {}/{}: {}", action, self.kind, path, id, err);
        RepositoryError::from_store(self.kind, err)
    }

    pub async fn get_one(&self, path: &TreePath, id: &str) -> Result<T, RepositoryError> {
        let doc = self
            .store
            .get_one(path, id)
            .await
            .map_err(|e| self.fail("fetch", path, id, e))?;
        self.decode(&doc)
    }

    pub async fn get_all(&self, path: &TreePath) -> Result<Vec<(String, T)>, RepositoryError> {
        let docs = self
            .store
            .get_all_children(path)
            .await
            .map_err(|e| self.fail("list", path, "*", e))?;
        docs.iter()
            .map(|doc| Ok::<_, RepositoryError>((doc.id.clone(), self.decode(doc)?)))
            .collect()
    }

    /// Raw document fetch for callers reading individual fields
    pub async fn get_document(&self, path: &TreePath, id: &str) -> Result<Document, RepositoryError> {
        self.store
            .get_one(path, id)
            .await
            .map_err(|e| self.fail("fetch", path, id, e))
    }

    /// Raw fetch that reads a missing document as `None`
    pub async fn find_document(&self, path: &TreePath, id: &str) -> Result<Option<Document>, RepositoryError> {
        match self.store.get_one(path, id).await {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(self.fail("fetch", path, id, e)),
        }
    }

    pub async fn exists(&self, path: &TreePath, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.find_document(path, id).await?.is_some())
    }

    pub async fn set(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), RepositoryError> {
        self.store
            .set_document(path, id, fields)
            .await
            .map_err(|e| self.fail("write", path, id, e))
    }

    pub async fn update(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), RepositoryError> {
        self.store
            .update_fields(path, id, fields)
            .await
            .map_err(|e| self.fail("update", path, id, e))
    }

    pub async fn delete(&self, path: &TreePath, id: &str) -> Result<(), RepositoryError> {
        self.store
            .delete_one(path, id)
            .await
            .map_err(|e| self.fail("delete", path, id, e))
    }

    /// Store-assigned key for a new document
    pub fn new_id(&self) -> String {
        self.store.new_id()
    }
}

/// Payload serialization failures are programming errors, but still surface
/// as store errors instead of panicking
pub(crate) fn record_fields<T: serde::Serialize>(record: &T) -> Result<Fields, RepositoryError> {
    Fields::from_record(record).map_err(|e| RepositoryError::Store(StoreError::Serialization(e)))
}

/// Shared title/index checks for indexed levels
pub(crate) fn validate_indexed(intitule: &str, index: u32) -> Result<(), RepositoryError> {
    if intitule.trim().is_empty() {
        return Err(RepositoryError::Validation("intitule must not be empty".to_string()));
    }
    if index == 0 {
        return Err(RepositoryError::Validation("index must be a positive integer".to_string()));
    }
    Ok(())
}

/// Payload for Module / Chapitre / Leçon add and update. The icon key is
/// only present when a new icon is supplied.
pub(crate) fn indexed_fields(intitule: &str, index: u32, icon: Option<&str>) -> Fields {
    Fields::new()
        .set("intitule", intitule)
        .set("index", index)
        .set_if_present("icon", icon)
}

impl<T: DeserializeOwned> Collection<T> {
    /// Create an indexed level document under the key derived from `index`
    ///
    /// Keys are fixed at creation, so an occupied key is a conflict rather
    /// than an overwrite.
    pub async fn add_indexed(
        &self,
        path: &TreePath,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<String, RepositoryError> {
        validate_indexed(intitule, index)?;
        let key = self.kind.derived_key(index).ok_or_else(|| {
            RepositoryError::Validation(format!("{} keys are not derived from an index", self.kind))
        })?;

        if self.exists(path, &key).await? {
            return Err(RepositoryError::Conflict(format!(
                "{} {} already exists under {}",
                self.kind, key, path
            )));
        }
        self.set(path, &key, indexed_fields(intitule, index, icon)).await?;
        Ok(key)
    }

    /// Title/index/icon edit. The key does not follow a changed index.
    pub async fn update_indexed(
        &self,
        path: &TreePath,
        id: &str,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        validate_indexed(intitule, index)?;
        self.update(path, id, indexed_fields(intitule, index, icon)).await
    }
}
