use std::sync::Arc;
use tracing::info;

use crate::models::{Classe, Node};
use crate::repository::propagator::FIELD_LAST_UPDATE;
use crate::repository::{Collection, RepositoryError};
use crate::store::{DocumentStore, Fields, TreePath};
use crate::types::NodeKind;

/// Minimum length of a user-supplied Classe / Matière key
pub const MIN_KEY_LEN: usize = 2;

pub(crate) fn validate_user_key(id: &str) -> Result<(), RepositoryError> {
    if id.trim().chars().count() < MIN_KEY_LEN {
        return Err(RepositoryError::Validation(format!(
            "identifier must contain at least {} non-space characters",
            MIN_KEY_LEN
        )));
    }
    Ok(())
}

pub(crate) fn validate_nom(nom: &str) -> Result<(), RepositoryError> {
    if nom.trim().is_empty() {
        return Err(RepositoryError::Validation("nom must not be empty".to_string()));
    }
    Ok(())
}

/// Top-level Classe documents
///
/// Name uniqueness is checked with a read before the write. The two steps
/// are separate round trips, so concurrent renames can still race.
#[derive(Clone)]
pub struct ClasseRepository {
    docs: Collection<Classe>,
}

impl ClasseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Collection::new(store, NodeKind::Classe),
        }
    }

    /// Exact-match name lookup, ignoring the Classe keyed `exclude_id`
    pub async fn check_class_exists(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let classes = self.docs.get_all(&TreePath::classes()).await?;
        Ok(classes
            .iter()
            .any(|(id, classe)| classe.nom == name && Some(id.as_str()) != exclude_id))
    }

    pub async fn add(&self, id: &str, nom: &str) -> Result<(), RepositoryError> {
        let id = id.trim();
        validate_user_key(id)?;
        validate_nom(nom)?;

        if self.check_class_exists(nom, None).await? {
            return Err(RepositoryError::Conflict(format!("a classe named {:?} already exists", nom)));
        }
        let path = TreePath::classes();
        if self.docs.exists(&path, id).await? {
            return Err(RepositoryError::Conflict(format!("classe key {:?} is already taken", id)));
        }

        let fields = Fields::new().set("nom", nom).server_timestamp(FIELD_LAST_UPDATE);
        self.docs.set(&path, id, fields).await?;
        info!("Created classe {} ({})", id, nom);
        Ok(())
    }

    /// Rename; the document key is unchanged
    pub async fn update(&self, id: &str, nom: &str) -> Result<(), RepositoryError> {
        validate_nom(nom)?;
        if self.check_class_exists(nom, Some(id)).await? {
            return Err(RepositoryError::Conflict(format!("a classe named {:?} already exists", nom)));
        }

        let fields = Fields::new().set("nom", nom).server_timestamp(FIELD_LAST_UPDATE);
        self.docs.update(&TreePath::classes(), id, fields).await
    }

    /// Removes only the Classe document; its Matières stay in the store
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&TreePath::classes(), id).await?;
        info!("Deleted classe {}", id);
        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<Node<Classe>>, RepositoryError> {
        let classes = self.docs.get_all(&TreePath::classes()).await?;
        Ok(classes.into_iter().map(|(id, c)| Node::new(id, c)).collect())
    }

    pub async fn get_one(&self, id: &str) -> Result<Node<Classe>, RepositoryError> {
        let classe = self.docs.get_one(&TreePath::classes(), id).await?;
        Ok(Node::new(id, classe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> ClasseRepository {
        ClasseRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_until_deleted() {
        let classes = repo();
        classes.add("6e", "Sixième").await.unwrap();
        assert!(classes.check_class_exists("Sixième", None).await.unwrap());

        let err = classes.add("6eme", "Sixième").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        classes.delete("6e").await.unwrap();
        assert!(!classes.check_class_exists("Sixième", None).await.unwrap());
        classes.add("6eme", "Sixième").await.unwrap();
    }

    #[tokio::test]
    async fn rename_excludes_own_key() {
        let classes = repo();
        classes.add("6e", "Sixième").await.unwrap();
        classes.add("5e", "Cinquième").await.unwrap();

        classes.update("6e", "Sixième").await.unwrap();
        let err = classes.update("6e", "Cinquième").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn short_keys_are_rejected() {
        let err = repo().add(" a ", "A").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_attaches_type_and_title() {
        let classes = repo();
        classes.add("6e", "Sixième").await.unwrap();
        let all = classes.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind, NodeKind::Classe);
        assert_eq!(all[0].title, "Sixième");
        assert!(all[0].data.last_update.is_some());
    }

    #[tokio::test]
    async fn missing_classe_is_not_found() {
        let err = repo().get_one("ghost").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { kind: NodeKind::Classe, .. }));
        let err = repo().update("ghost", "Fantôme").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
