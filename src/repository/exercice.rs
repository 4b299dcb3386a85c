use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::models::{Difficulty, Entry, Exercice};
use crate::repository::{record_fields, Collection, RepositoryError};
use crate::store::{DocumentStore, LeconRef, TreePath};
use crate::types::NodeKind;

const FIELD_CREATED_AT: &str = "createdAt";
const FIELD_UPDATED_AT: &str = "updatedAt";

#[derive(Clone)]
pub struct ExerciceRepository {
    docs: Collection<Exercice>,
}

impl ExerciceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Collection::new(store, NodeKind::Exercice),
        }
    }

    /// Create or replace an exercise. `createdAt` survives replacement,
    /// `updatedAt` is stamped on every save.
    pub async fn save(
        &self,
        lecon: &LeconRef,
        id: Option<&str>,
        exercice: Exercice,
    ) -> Result<String, RepositoryError> {
        exercice.validate().map_err(RepositoryError::Validation)?;
        let path = lecon.exercices()?;

        let (id, created_at) = match id {
            Some(id) => (id.to_string(), self.stored_created_at(&path, id).await?),
            None => (self.docs.new_id(), None),
        };

        self.write(lecon, &path, &id, exercice, created_at).await?;
        Ok(id)
    }

    pub async fn create(&self, lecon: &LeconRef, exercice: Exercice) -> Result<String, RepositoryError> {
        self.save(lecon, None, exercice).await
    }

    /// Replace an existing exercise; `NotFound` when the key is unknown
    pub async fn update(&self, lecon: &LeconRef, id: &str, exercice: Exercice) -> Result<(), RepositoryError> {
        exercice.validate().map_err(RepositoryError::Validation)?;
        let path = lecon.exercices()?;
        let created_at = self.docs.get_document(&path, id).await?.get(FIELD_CREATED_AT).cloned();
        self.write(lecon, &path, id, exercice, created_at).await
    }

    /// `createdAt` of the stored exercise, `None` when there is none yet
    async fn stored_created_at(&self, path: &TreePath, id: &str) -> Result<Option<Value>, RepositoryError> {
        let doc = self.docs.find_document(path, id).await?;
        Ok(doc.and_then(|doc| doc.get(FIELD_CREATED_AT).cloned()))
    }

    async fn write(
        &self,
        lecon: &LeconRef,
        path: &TreePath,
        id: &str,
        exercice: Exercice,
        created_at: Option<Value>,
    ) -> Result<(), RepositoryError> {
        let fields = record_fields(&exercice.normalized())?.server_timestamp(FIELD_UPDATED_AT);
        let fields = match created_at {
            Some(created) => fields.set(FIELD_CREATED_AT, created),
            None => fields.server_timestamp(FIELD_CREATED_AT),
        };
        self.docs.set(path, id, fields).await?;
        info!("Saved exercice {} in lesson {}", id, lecon.lecon_id);
        Ok(())
    }

    pub async fn delete(&self, lecon: &LeconRef, id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&lecon.exercices()?, id).await?;
        info!("Deleted exercice {} in lesson {}", id, lecon.lecon_id);
        Ok(())
    }

    pub async fn get_one(&self, lecon: &LeconRef, id: &str) -> Result<Entry<Exercice>, RepositoryError> {
        let exercice = self.docs.get_one(&lecon.exercices()?, id).await?;
        Ok(Entry::new(id, exercice))
    }

    pub async fn get_all(&self, lecon: &LeconRef) -> Result<Vec<Entry<Exercice>>, RepositoryError> {
        let exercices = self.docs.get_all(&lecon.exercices()?).await?;
        Ok(exercices.into_iter().map(|(id, e)| Entry::new(id, e)).collect())
    }

    pub async fn get_by_niveau(
        &self,
        lecon: &LeconRef,
        niveau: Difficulty,
    ) -> Result<Vec<Entry<Exercice>>, RepositoryError> {
        let mut exercices = self.get_all(lecon).await?;
        exercices.retain(|e| e.data.niveau == niveau);
        Ok(exercices)
    }
}
