use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Past exam paper filed under a Matière
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sujet {
    #[serde(rename = "anneeScolaire")]
    pub annee_scolaire: String,
    pub etablissement: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub examinateur: String,
    pub url_doc: String,
    /// Term or sequence the paper was set for
    pub sequence: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Sujet {
    pub(crate) fn normalized(mut self) -> Self {
        self.created_at = None;
        self.updated_at = None;
        self
    }
}
