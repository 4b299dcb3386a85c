use serde_json::Value;
use std::sync::Arc;

use crate::models::{Entry, ExerciceVideo};
use crate::repository::{record_fields, Collection, RepositoryError};
use crate::store::{DocumentStore, LeconRef};
use crate::types::NodeKind;

#[derive(Clone)]
pub struct ExerciceVideoRepository {
    docs: Collection<ExerciceVideo>,
}

impl ExerciceVideoRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Collection::new(store, NodeKind::ExerciceVideo),
        }
    }

    /// Saving onto an existing key merges, so fields written by other
    /// clients are kept
    pub async fn save(
        &self,
        lecon: &LeconRef,
        id: Option<&str>,
        video: ExerciceVideo,
    ) -> Result<String, RepositoryError> {
        video.validate().map_err(RepositoryError::Validation)?;
        let path = lecon.exercices_video()?;
        let video = video.normalized();
        let fields = record_fields(&video)?;

        match id {
            Some(id) if self.docs.exists(&path, id).await? => {
                // an omitted description clears the stored one
                let fields = match video.description {
                    Some(_) => fields,
                    None => fields.set("description", Value::Null),
                };
                self.docs.update(&path, id, fields).await?;
                Ok(id.to_string())
            }
            Some(id) => {
                self.docs.set(&path, id, fields).await?;
                Ok(id.to_string())
            }
            None => {
                let id = self.docs.new_id();
                self.docs.set(&path, &id, fields).await?;
                Ok(id)
            }
        }
    }

    pub async fn delete(&self, lecon: &LeconRef, id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&lecon.exercices_video()?, id).await
    }

    pub async fn get_all(&self, lecon: &LeconRef) -> Result<Vec<Entry<ExerciceVideo>>, RepositoryError> {
        let videos = self.docs.get_all(&lecon.exercices_video()?).await?;
        Ok(videos.into_iter().map(|(id, v)| Entry::new(id, v)).collect())
    }
}
