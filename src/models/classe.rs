use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TreeNode;
use crate::types::NodeKind;

/// Grade level, the root of the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classe {
    pub nom: String,
    /// Bumped by every mutation in the Classe's subtree
    #[serde(rename = "lastUpdate", default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl TreeNode for Classe {
    const KIND: NodeKind = NodeKind::Classe;

    fn title(&self) -> &str {
        &self.nom
    }
}
