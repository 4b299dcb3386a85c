use serde::{Deserialize, Serialize};

use crate::models::{de_index, TreeNode};
use crate::types::NodeKind;

/// Shape shared by Module and Chapitre documents
///
/// `index` orders siblings; the document key was derived from the index at
/// creation and never follows later edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub intitule: String,
    #[serde(deserialize_with = "de_index")]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A Module or a Chapitre, tagged with its level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Module(pub Section);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapitre(pub Section);

impl TreeNode for Module {
    const KIND: NodeKind = NodeKind::Module;

    fn title(&self) -> &str {
        &self.0.intitule
    }
}

impl TreeNode for Chapitre {
    const KIND: NodeKind = NodeKind::Chapitre;

    fn title(&self) -> &str {
        &self.0.intitule
    }
}
