use std::sync::Arc;
use tracing::info;

use crate::models::{Module, Node};
use crate::repository::{Collection, Propagator, RepositoryError};
use crate::store::{DocumentStore, MatiereRef};
use crate::types::NodeKind;

#[derive(Clone)]
pub struct ModuleRepository {
    docs: Collection<Module>,
    propagator: Propagator,
}

impl ModuleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            docs: Collection::new(store, NodeKind::Module),
        }
    }

    /// Returns the derived key, `module-{index}`
    pub async fn add(
        &self,
        matiere: &MatiereRef,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let key = self
            .docs
            .add_indexed(&matiere.modules()?, intitule, index, icon)
            .await?;
        info!("Created module {} in {}/{}", key, matiere.classe_id, matiere.matiere_id);
        self.propagator.touch(&matiere.classe_id).await;
        Ok(key)
    }

    pub async fn update(
        &self,
        matiere: &MatiereRef,
        module_id: &str,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.docs
            .update_indexed(&matiere.modules()?, module_id, intitule, index, icon)
            .await?;
        self.propagator.touch(&matiere.classe_id).await;
        Ok(())
    }

    pub async fn delete(&self, matiere: &MatiereRef, module_id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&matiere.modules()?, module_id).await?;
        info!("Deleted module {} in {}/{}", module_id, matiere.classe_id, matiere.matiere_id);
        self.propagator.touch(&matiere.classe_id).await;
        Ok(())
    }

    /// Modules ordered by their display index
    pub async fn get_all(&self, matiere: &MatiereRef) -> Result<Vec<Node<Module>>, RepositoryError> {
        let mut modules = self.docs.get_all(&matiere.modules()?).await?;
        modules.sort_by_key(|(_, m)| m.0.index);
        Ok(modules.into_iter().map(|(id, m)| Node::new(id, m)).collect())
    }

    pub async fn get_one(&self, matiere: &MatiereRef, module_id: &str) -> Result<Node<Module>, RepositoryError> {
        let module = self.docs.get_one(&matiere.modules()?, module_id).await?;
        Ok(Node::new(module_id, module))
    }
}
