use std::sync::Arc;
use tracing::info;

use crate::models::lecon::{FIELD_DOC_URL, FIELD_LAST_UPDATED};
use crate::models::{Lecon, Node};
use crate::repository::{Collection, Propagator, RepositoryError};
use crate::store::{ChapitreRef, DocumentStore, Fields, LeconRef};
use crate::types::NodeKind;

#[derive(Clone)]
pub struct LeconRepository {
    docs: Collection<Lecon>,
    propagator: Propagator,
}

impl LeconRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            docs: Collection::new(store, NodeKind::Lesson),
        }
    }

    /// Returns the derived key, `lesson-{index}`
    pub async fn add(
        &self,
        chapitre: &ChapitreRef,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let key = self
            .docs
            .add_indexed(&chapitre.lecons()?, intitule, index, icon)
            .await?;
        info!("Created lesson {} in chapitre {}", key, chapitre.chapitre_id);
        self.propagator.touch(&chapitre.classe_id).await;
        Ok(key)
    }

    /// Title/index/icon only; course fields are written through `update_course`
    pub async fn update(
        &self,
        chapitre: &ChapitreRef,
        lecon_id: &str,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.docs
            .update_indexed(&chapitre.lecons()?, lecon_id, intitule, index, icon)
            .await?;
        self.propagator.touch(&chapitre.classe_id).await;
        Ok(())
    }

    /// Merge course-material fields into the lesson, stamping `last_updated`
    pub async fn update_course(&self, lecon: &LeconRef, fields: Fields) -> Result<(), RepositoryError> {
        let fields = fields.server_timestamp(FIELD_LAST_UPDATED);
        self.docs.update(&lecon.parent()?, &lecon.lecon_id, fields).await?;
        self.propagator.touch(&lecon.classe_id).await;
        Ok(())
    }

    /// Swap in a freshly issued document link. A refresh is not a content
    /// edit: neither `last_updated` nor the Classe `lastUpdate` moves.
    pub async fn refresh_document_url(&self, lecon: &LeconRef, url: &str) -> Result<(), RepositoryError> {
        let fields = Fields::new().set(FIELD_DOC_URL, url);
        self.docs.update(&lecon.parent()?, &lecon.lecon_id, fields).await
    }

    /// Questions, exercices and vidéos under the lesson are kept
    pub async fn delete(&self, chapitre: &ChapitreRef, lecon_id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&chapitre.lecons()?, lecon_id).await?;
        info!("Deleted lesson {} in chapitre {}", lecon_id, chapitre.chapitre_id);
        self.propagator.touch(&chapitre.classe_id).await;
        Ok(())
    }

    pub async fn get_all(&self, chapitre: &ChapitreRef) -> Result<Vec<Node<Lecon>>, RepositoryError> {
        let mut lecons = self.docs.get_all(&chapitre.lecons()?).await?;
        lecons.sort_by_key(|(_, l)| l.index);
        Ok(lecons.into_iter().map(|(id, l)| Node::new(id, l)).collect())
    }

    pub async fn get_one(&self, lecon: &LeconRef) -> Result<Node<Lecon>, RepositoryError> {
        let data = self.docs.get_one(&lecon.parent()?, &lecon.lecon_id).await?;
        Ok(Node::new(lecon.lecon_id.as_str(), data))
    }
}
