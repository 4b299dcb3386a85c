use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{error, info};

use crate::repository::{Propagator, RepositoryError};
use crate::store::path::matieres_path;
use crate::store::{DocumentStore, MatiereRef, StoreError, TreePath};
use crate::types::NodeKind;

/// Child collections stored under a document of the given collection
fn child_collections(collection: &str) -> &'static [NodeKind] {
    match collection {
        "classes" => &[NodeKind::Matiere],
        "matieres" => &[NodeKind::Module, NodeKind::Sujet],
        "modules" => &[NodeKind::Chapitre],
        "chapitres" => &[NodeKind::Lesson],
        "lecons" => &[NodeKind::Question, NodeKind::Exercice, NodeKind::ExerciceVideo],
        _ => &[],
    }
}

/// Explicit subtree deletion
///
/// Single-entity deletes leave descendants in place; these operations are
/// the opt-in way to remove a whole branch. Descendants are deleted
/// depth-first before their parent, one document per round trip, so a
/// failure part-way leaves the untouched remainder reachable.
#[derive(Clone)]
pub struct Cascade {
    store: Arc<dyn DocumentStore>,
    propagator: Propagator,
}

impl Cascade {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Returns the number of documents removed, the Classe included
    pub async fn delete_classe_subtree(&self, classe_id: &str) -> Result<usize, RepositoryError> {
        let removed = self
            .delete_subtree(TreePath::classes(), classe_id.to_string())
            .await
            .map_err(|e| self.fail(&TreePath::classes(), classe_id, e))?;
        info!("Deleted classe {} and {} descendants", classe_id, removed - 1);
        Ok(removed)
    }

    pub async fn delete_matiere_subtree(&self, matiere: &MatiereRef) -> Result<usize, RepositoryError> {
        let path = matieres_path(&matiere.classe_id)?;
        let removed = self
            .delete_subtree(path.clone(), matiere.matiere_id.clone())
            .await
            .map_err(|e| self.fail(&path, &matiere.matiere_id, e))?;
        info!(
            "Deleted matiere {}/{} and {} descendants",
            matiere.classe_id,
            matiere.matiere_id,
            removed - 1
        );
        self.propagator.touch(&matiere.classe_id).await;
        Ok(removed)
    }

    fn fail(&self, path: &TreePath, id: &str, err: StoreError) -> RepositoryError {
        error!("Failed to delete subtree {}/{}: {}", path, id, err);
        err.into()
    }

    fn delete_subtree(&self, path: TreePath, id: String) -> BoxFuture<'_, Result<usize, StoreError>> {
        async move {
            let mut removed = 0;
            for kind in child_collections(path.collection_name()) {
                let child_path = path.child(&id, kind.collection())?;
                for child in self.store.get_all_children(&child_path).await? {
                    removed += self.delete_subtree(child_path.clone(), child.id).await?;
                }
            }
            self.store.delete_one(&path, &id).await?;
            Ok(removed + 1)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fields, MemoryStore};

    async fn seed(store: &MemoryStore) {
        let maths = MatiereRef::new("6e", "maths");
        let lecon = maths.module("module-1").chapitre("chapitre-1").lecon("lesson-1");
        let docs = [
            (TreePath::classes(), "6e"),
            (matieres_path("6e").unwrap(), "maths"),
            (matieres_path("6e").unwrap(), "svt"),
            (maths.modules().unwrap(), "module-1"),
            (maths.sujets().unwrap(), "bac-2024"),
            (maths.module("module-1").chapitres().unwrap(), "chapitre-1"),
            (lecon.parent().unwrap(), "lesson-1"),
            (lecon.questions().unwrap(), "q1"),
            (lecon.exercices().unwrap(), "e1"),
            (lecon.exercices_video().unwrap(), "v1"),
        ];
        for (path, id) in docs {
            store.set_document(&path, id, Fields::new().set("nom", id)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn matiere_subtree_removes_every_descendant() {
        let store = Arc::new(MemoryStore::new());
        seed(&store).await;
        let cascade = Cascade::new(store.clone());

        let removed = cascade
            .delete_matiere_subtree(&MatiereRef::new("6e", "maths"))
            .await
            .unwrap();
        assert_eq!(removed, 8);
        // the classe and the sibling matiere remain
        assert_eq!(store.document_count().await, 2);
        assert!(store.get_one(&matieres_path("6e").unwrap(), "svt").await.is_ok());
    }

    #[tokio::test]
    async fn classe_subtree_empties_the_store() {
        let store = Arc::new(MemoryStore::new());
        seed(&store).await;
        let removed = Cascade::new(store.clone()).delete_classe_subtree("6e").await.unwrap();
        assert_eq!(removed, 10);
        assert_eq!(store.document_count().await, 0);
    }
}
