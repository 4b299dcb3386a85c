use std::sync::Arc;
use tracing::info;

use crate::models::{Chapitre, Node};
use crate::repository::{Collection, Propagator, RepositoryError};
use crate::store::{DocumentStore, ModuleRef};
use crate::types::NodeKind;

#[derive(Clone)]
pub struct ChapitreRepository {
    docs: Collection<Chapitre>,
    propagator: Propagator,
}

impl ChapitreRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            docs: Collection::new(store, NodeKind::Chapitre),
        }
    }

    pub async fn add(
        &self,
        module: &ModuleRef,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let key = self
            .docs
            .add_indexed(&module.chapitres()?, intitule, index, icon)
            .await?;
        info!("Created chapitre {} in module {}", key, module.module_id);
        self.propagator.touch(&module.classe_id).await;
        Ok(key)
    }

    pub async fn update(
        &self,
        module: &ModuleRef,
        chapitre_id: &str,
        intitule: &str,
        index: u32,
        icon: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.docs
            .update_indexed(&module.chapitres()?, chapitre_id, intitule, index, icon)
            .await?;
        self.propagator.touch(&module.classe_id).await;
        Ok(())
    }

    pub async fn delete(&self, module: &ModuleRef, chapitre_id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&module.chapitres()?, chapitre_id).await?;
        info!("Deleted chapitre {} in module {}", chapitre_id, module.module_id);
        self.propagator.touch(&module.classe_id).await;
        Ok(())
    }

    pub async fn get_all(&self, module: &ModuleRef) -> Result<Vec<Node<Chapitre>>, RepositoryError> {
        let mut chapitres = self.docs.get_all(&module.chapitres()?).await?;
        chapitres.sort_by_key(|(_, c)| c.0.index);
        Ok(chapitres.into_iter().map(|(id, c)| Node::new(id, c)).collect())
    }

    pub async fn get_one(&self, module: &ModuleRef, chapitre_id: &str) -> Result<Node<Chapitre>, RepositoryError> {
        let chapitre = self.docs.get_one(&module.chapitres()?, chapitre_id).await?;
        Ok(Node::new(chapitre_id, chapitre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MatiereRef, MemoryStore};

    #[tokio::test]
    async fn update_keeps_icon_when_none_given() {
        let chapitres = ChapitreRepository::new(Arc::new(MemoryStore::new()));
        let module = MatiereRef::new("6e", "maths").module("module-1");

        let key = chapitres.add(&module, "Fractions", 2, Some("aWNvbg==")).await.unwrap();
        assert_eq!(key, "chapitre-2");
        chapitres.update(&module, &key, "Fractions simples", 2, None).await.unwrap();

        let chapitre = chapitres.get_one(&module, &key).await.unwrap();
        assert_eq!(chapitre.kind, NodeKind::Chapitre);
        assert_eq!(chapitre.data.0.icon.as_deref(), Some("aWNvbg=="));
    }
}
