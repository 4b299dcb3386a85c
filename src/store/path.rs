use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::StoreError;
use crate::types::NodeKind;

/// Slash-delimited collection path built from ancestor ids,
/// e.g. `classes/6e/matieres/maths/modules`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(String);

impl TreePath {
    /// Top-level `classes` collection
    pub fn classes() -> Self {
        TreePath(NodeKind::Classe.collection().to_string())
    }

    /// Descend into `collection` under the document `id` of this collection
    pub fn child(&self, id: &str, collection: &str) -> Result<Self, StoreError> {
        validate_id(id)?;
        Ok(TreePath(format!("{}/{}/{}", self.0, id, collection)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment - the collection name itself
    pub fn collection_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Id of the Classe owning this path, if the path is below a Classe
    pub fn classe_id(&self) -> Option<&str> {
        let mut segments = self.0.split('/');
        match (segments.next(), segments.next()) {
            (Some("classes"), Some(id)) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document keys must be non-empty and must not contain the path separator
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.trim().is_empty() || id.contains('/') {
        return Err(StoreError::InvalidPath(id.to_string()));
    }
    Ok(())
}

// Typed ancestor references. Field names match the HTTP route parameters
// so the handlers can extract them directly.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatiereRef {
    pub classe_id: String,
    pub matiere_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    pub classe_id: String,
    pub matiere_id: String,
    pub module_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapitreRef {
    pub classe_id: String,
    pub matiere_id: String,
    pub module_id: String,
    pub chapitre_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeconRef {
    pub classe_id: String,
    pub matiere_id: String,
    pub module_id: String,
    pub chapitre_id: String,
    pub lecon_id: String,
}

/// `classes/{c}/matieres`
pub fn matieres_path(classe_id: &str) -> Result<TreePath, StoreError> {
    TreePath::classes().child(classe_id, NodeKind::Matiere.collection())
}

impl MatiereRef {
    pub fn new(classe_id: impl Into<String>, matiere_id: impl Into<String>) -> Self {
        Self {
            classe_id: classe_id.into(),
            matiere_id: matiere_id.into(),
        }
    }

    pub fn modules(&self) -> Result<TreePath, StoreError> {
        matieres_path(&self.classe_id)?.child(&self.matiere_id, NodeKind::Module.collection())
    }

    pub fn sujets(&self) -> Result<TreePath, StoreError> {
        matieres_path(&self.classe_id)?.child(&self.matiere_id, NodeKind::Sujet.collection())
    }

    pub fn module(&self, module_id: impl Into<String>) -> ModuleRef {
        ModuleRef {
            classe_id: self.classe_id.clone(),
            matiere_id: self.matiere_id.clone(),
            module_id: module_id.into(),
        }
    }
}

impl ModuleRef {
    pub fn matiere(&self) -> MatiereRef {
        MatiereRef::new(&self.classe_id, &self.matiere_id)
    }

    pub fn chapitres(&self) -> Result<TreePath, StoreError> {
        self.matiere()
            .modules()?
            .child(&self.module_id, NodeKind::Chapitre.collection())
    }

    pub fn chapitre(&self, chapitre_id: impl Into<String>) -> ChapitreRef {
        ChapitreRef {
            classe_id: self.classe_id.clone(),
            matiere_id: self.matiere_id.clone(),
            module_id: self.module_id.clone(),
            chapitre_id: chapitre_id.into(),
        }
    }
}

impl ChapitreRef {
    pub fn module(&self) -> ModuleRef {
        MatiereRef::new(&self.classe_id, &self.matiere_id).module(&self.module_id)
    }

    pub fn lecons(&self) -> Result<TreePath, StoreError> {
        self.module()
            .chapitres()?
            .child(&self.chapitre_id, NodeKind::Lesson.collection())
    }

    pub fn lecon(&self, lecon_id: impl Into<String>) -> LeconRef {
        LeconRef {
            classe_id: self.classe_id.clone(),
            matiere_id: self.matiere_id.clone(),
            module_id: self.module_id.clone(),
            chapitre_id: self.chapitre_id.clone(),
            lecon_id: lecon_id.into(),
        }
    }
}

impl LeconRef {
    pub fn chapitre(&self) -> ChapitreRef {
        self.module_ref().chapitre(&self.chapitre_id)
    }

    fn module_ref(&self) -> ModuleRef {
        MatiereRef::new(&self.classe_id, &self.matiere_id).module(&self.module_id)
    }

    /// Collection holding the lesson document itself
    pub fn parent(&self) -> Result<TreePath, StoreError> {
        self.chapitre().lecons()
    }

    pub fn questions(&self) -> Result<TreePath, StoreError> {
        self.sub_collection(NodeKind::Question)
    }

    pub fn exercices(&self) -> Result<TreePath, StoreError> {
        self.sub_collection(NodeKind::Exercice)
    }

    pub fn exercices_video(&self) -> Result<TreePath, StoreError> {
        self.sub_collection(NodeKind::ExerciceVideo)
    }

    fn sub_collection(&self, kind: NodeKind) -> Result<TreePath, StoreError> {
        self.parent()?.child(&self.lecon_id, kind.collection())
    }
}
