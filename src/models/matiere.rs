use serde::{Deserialize, Serialize};

use crate::models::TreeNode;
use crate::types::NodeKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matiere {
    pub nom: String,
    /// Base64 image, already compressed by the uploader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TreeNode for Matiere {
    const KIND: NodeKind = NodeKind::Matiere;

    fn title(&self) -> &str {
        &self.nom
    }
}
