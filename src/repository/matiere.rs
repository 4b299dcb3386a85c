use std::sync::Arc;
use tracing::info;

use crate::models::{Matiere, Node};
use crate::repository::classe::{validate_nom, validate_user_key};
use crate::repository::{Collection, Propagator, RepositoryError};
use crate::store::path::matieres_path;
use crate::store::{DocumentStore, Fields};
use crate::types::NodeKind;

#[derive(Clone)]
pub struct MatiereRepository {
    docs: Collection<Matiere>,
    propagator: Propagator,
}

impl MatiereRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            docs: Collection::new(store, NodeKind::Matiere),
        }
    }

    pub async fn add(
        &self,
        classe_id: &str,
        matiere_id: &str,
        nom: &str,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let matiere_id = matiere_id.trim();
        validate_user_key(matiere_id)?;
        validate_nom(nom)?;

        let path = matieres_path(classe_id)?;
        if self.docs.exists(&path, matiere_id).await? {
            return Err(RepositoryError::Conflict(format!(
                "matiere {:?} already exists in classe {:?}",
                matiere_id, classe_id
            )));
        }

        let fields = Fields::new().set("nom", nom).set_if_present("icon", icon);
        self.docs.set(&path, matiere_id, fields).await?;
        info!("Created matiere {}/{}", classe_id, matiere_id);
        self.propagator.touch(classe_id).await;
        Ok(())
    }

    /// Without a new icon the stored icon is left untouched
    pub async fn update(
        &self,
        classe_id: &str,
        matiere_id: &str,
        nom: &str,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        validate_nom(nom)?;
        let fields = Fields::new().set("nom", nom).set_if_present("icon", icon);
        self.docs
            .update(&matieres_path(classe_id)?, matiere_id, fields)
            .await?;
        self.propagator.touch(classe_id).await;
        Ok(())
    }

    /// Orphan-preserving: modules and sujets under the Matière are kept
    pub async fn delete(&self, classe_id: &str, matiere_id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&matieres_path(classe_id)?, matiere_id).await?;
        info!("Deleted matiere {}/{}", classe_id, matiere_id);
        self.propagator.touch(classe_id).await;
        Ok(())
    }

    pub async fn get_all(&self, classe_id: &str) -> Result<Vec<Node<Matiere>>, RepositoryError> {
        let matieres = self.docs.get_all(&matieres_path(classe_id)?).await?;
        Ok(matieres.into_iter().map(|(id, m)| Node::new(id, m)).collect())
    }

    pub async fn get_one(&self, classe_id: &str, matiere_id: &str) -> Result<Node<Matiere>, RepositoryError> {
        let matiere = self.docs.get_one(&matieres_path(classe_id)?, matiere_id).await?;
        Ok(Node::new(matiere_id, matiere))
    }
}
