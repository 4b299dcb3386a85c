use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::models::{Entry, Sujet};
use crate::repository::{record_fields, Collection, Propagator, RepositoryError};
use crate::store::{DocumentStore, MatiereRef, TreePath};
use crate::types::NodeKind;

/// `sujet_{millis}`, used when the caller does not pick a key
pub fn generated_sujet_id() -> String {
    format!("sujet_{}", Utc::now().timestamp_millis())
}

fn validate(sujet: &Sujet) -> Result<(), RepositoryError> {
    let required = [
        ("anneeScolaire", &sujet.annee_scolaire),
        ("etablissement", &sujet.etablissement),
        ("url_doc", &sujet.url_doc),
        ("sequence", &sujet.sequence),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(RepositoryError::Validation(format!("{} must not be empty", name))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct SujetRepository {
    docs: Collection<Sujet>,
    propagator: Propagator,
}

impl SujetRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            propagator: Propagator::new(Arc::clone(&store)),
            docs: Collection::new(store, NodeKind::Sujet),
        }
    }

    pub async fn add(
        &self,
        matiere: &MatiereRef,
        id: Option<&str>,
        sujet: Sujet,
    ) -> Result<String, RepositoryError> {
        validate(&sujet)?;
        let path = matiere.sujets()?;
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if self.docs.exists(&path, id).await? => {
                return Err(RepositoryError::Conflict(format!("sujet {:?} already exists", id)));
            }
            Some(id) => id.to_string(),
            None => self.free_key(&path, generated_sujet_id()).await?,
        };

        let fields = record_fields(&sujet.normalized())?
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");
        self.docs.set(&path, &id, fields).await?;
        info!("Created sujet {} in {}/{}", id, matiere.classe_id, matiere.matiere_id);
        self.propagator.touch(&matiere.classe_id).await;
        Ok(id)
    }

    /// Generated keys collide when two papers are filed within the same
    /// millisecond; later ones get a numeric suffix
    async fn free_key(&self, path: &TreePath, base: String) -> Result<String, RepositoryError> {
        if !self.docs.exists(path, &base).await? {
            return Ok(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.docs.exists(path, &candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn update(&self, matiere: &MatiereRef, id: &str, sujet: Sujet) -> Result<(), RepositoryError> {
        validate(&sujet)?;
        let fields = record_fields(&sujet.normalized())?.server_timestamp("updatedAt");
        self.docs.update(&matiere.sujets()?, id, fields).await?;
        self.propagator.touch(&matiere.classe_id).await;
        Ok(())
    }

    pub async fn delete(&self, matiere: &MatiereRef, id: &str) -> Result<(), RepositoryError> {
        self.docs.delete(&matiere.sujets()?, id).await?;
        self.propagator.touch(&matiere.classe_id).await;
        Ok(())
    }

    pub async fn get_all(&self, matiere: &MatiereRef) -> Result<Vec<Entry<Sujet>>, RepositoryError> {
        let sujets = self.docs.get_all(&matiere.sujets()?).await?;
        Ok(sujets.into_iter().map(|(id, s)| Entry::new(id, s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sujet() -> Sujet {
        Sujet {
            annee_scolaire: "2023-2024".into(),
            etablissement: "Lycée Bilingue".into(),
            examinateur: String::new(),
            url_doc: "https://example.org/sujet.pdf".into(),
            sequence: "Séquence 2".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn generates_key_when_none_given() {
        let sujets = SujetRepository::new(Arc::new(MemoryStore::new()));
        let matiere = MatiereRef::new("6e", "maths");
        let id = sujets.add(&matiere, None, sujet()).await.unwrap();
        assert!(id.starts_with("sujet_"));

        let all = sujets.get_all(&matiere).await.unwrap();
        assert_eq!(all[0].id, id);
        assert!(all[0].data.created_at.is_some());
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let sujets = SujetRepository::new(Arc::new(MemoryStore::new()));
        let matiere = MatiereRef::new("6e", "maths");
        sujets.add(&matiere, Some("bac-2024"), sujet()).await.unwrap();
        let created = sujets.get_all(&matiere).await.unwrap()[0].data.created_at;

        let mut edited = sujet();
        edited.examinateur = "M. Ndongo".into();
        sujets.update(&matiere, "bac-2024", edited).await.unwrap();

        let stored = &sujets.get_all(&matiere).await.unwrap()[0].data;
        assert_eq!(stored.examinateur, "M. Ndongo");
        assert_eq!(stored.created_at, created);
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let sujets = SujetRepository::new(Arc::new(MemoryStore::new()));
        let mut bad = sujet();
        bad.url_doc = " ".into();
        let err = sujets.add(&MatiereRef::new("6e", "maths"), None, bad).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn generated_key_collision_gets_a_suffix() {
        let sujets = SujetRepository::new(Arc::new(MemoryStore::new()));
        let matiere = MatiereRef::new("6e", "maths");
        sujets.add(&matiere, Some("sujet_1700000000000"), sujet()).await.unwrap();
        sujets.add(&matiere, Some("sujet_1700000000000_2"), sujet()).await.unwrap();

        let path = matiere.sujets().unwrap();
        let key = sujets.free_key(&path, "sujet_1700000000000".into()).await.unwrap();
        assert_eq!(key, "sujet_1700000000000_3");
        assert_eq!(sujets.free_key(&path, "sujet_1".into()).await.unwrap(), "sujet_1");
    }

    #[tokio::test]
    async fn explicit_key_collision_is_a_conflict() {
        let sujets = SujetRepository::new(Arc::new(MemoryStore::new()));
        let matiere = MatiereRef::new("6e", "maths");
        sujets.add(&matiere, Some("bac-2024"), sujet()).await.unwrap();
        let err = sujets.add(&matiere, Some("bac-2024"), sujet()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn null_examinateur_reads_as_empty() {
        let sujet: Sujet = serde_json::from_value(serde_json::json!({
            "anneeScolaire": "2023-2024",
            "etablissement": "Lycée Bilingue",
            "examinateur": null,
            "url_doc": "https://example.org/sujet.pdf",
            "sequence": "Séquence 2"
        }))
        .unwrap();
        assert_eq!(sujet.examinateur, "");
    }
}
