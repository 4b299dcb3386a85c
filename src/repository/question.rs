use std::sync::Arc;
use tracing::info;

use crate::models::{Entry, Question};
use crate::repository::{record_fields, Collection, RepositoryError};
use crate::store::{DocumentStore, LeconRef};
use crate::types::NodeKind;

const FIELD_LAST_UPDATED: &str = "lastUpdated";

/// Quiz questions of a lesson. Saves stamp the question's own
/// `lastUpdated` and leave the Classe alone.
#[derive(Clone)]
pub struct QuestionRepository {
    docs: Collection<Question>,
}

impl QuestionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Collection::new(store, NodeKind::Question),
        }
    }

    /// Create (no id) or fully replace (id) a question; returns its key
    pub async fn save(
        &self,
        lecon: &LeconRef,
        id: Option<&str>,
        question: Question,
    ) -> Result<String, RepositoryError> {
        question.validate().map_err(RepositoryError::Validation)?;

        let path = lecon.questions()?;
        let id = match id {
            Some(id) => id.to_string(),
            None => self.docs.new_id(),
        };
        let fields = record_fields(&question.normalized())?.server_timestamp(FIELD_LAST_UPDATED);
        self.docs.set(&path, &id, fields).await?;
        info!("Saved question {} in lesson {}", id, lecon.lecon_id);
        Ok(id)
    }

    pub async fn delete(&self, lecon: &LeconRef, id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&lecon.questions()?, id).await
    }

    pub async fn get_all(&self, lecon: &LeconRef) -> Result<Vec<Entry<Question>>, RepositoryError> {
        let questions = self.docs.get_all(&lecon.questions()?).await?;
        Ok(questions.into_iter().map(|(id, q)| Entry::new(id, q)).collect())
    }
}
