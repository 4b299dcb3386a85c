// handlers/params.rs - path parameters and shared request bodies

use serde::{Deserialize, Serialize};

use crate::models::de_index;
use crate::store::{LeconRef, MatiereRef};

#[derive(Debug, Deserialize)]
pub struct ClassePath {
    pub classe_id: String,
}

/// A document stored under a lesson (question, exercice, vidéo)
#[derive(Debug, Deserialize)]
pub struct LeconItemPath {
    pub classe_id: String,
    pub matiere_id: String,
    pub module_id: String,
    pub chapitre_id: String,
    pub lecon_id: String,
    pub item_id: String,
}

impl LeconItemPath {
    pub fn lecon(&self) -> LeconRef {
        MatiereRef::new(&self.classe_id, &self.matiere_id)
            .module(&self.module_id)
            .chapitre(&self.chapitre_id)
            .lecon(&self.lecon_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct SujetPath {
    pub classe_id: String,
    pub matiere_id: String,
    pub sujet_id: String,
}

impl SujetPath {
    pub fn matiere(&self) -> MatiereRef {
        MatiereRef::new(&self.classe_id, &self.matiere_id)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Remove the whole subtree instead of the single document
    #[serde(default)]
    pub cascade: bool,
}

/// Body for Module / Chapitre / Leçon create and update
#[derive(Debug, Deserialize)]
pub struct IndexedBody {
    pub intitule: String,
    #[serde(deserialize_with = "de_index")]
    pub index: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    /// Documents removed, 1 unless the delete cascaded
    pub removed: usize,
}

impl Deleted {
    pub fn single(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            removed: 1,
        }
    }
}
