// Per-entity record types
//
// Stored documents are decoded at the repository boundary; a document that
// lacks a required field fails there instead of surfacing half-empty records.

pub mod classe;
pub mod exercice;
pub mod exercice_video;
pub mod lecon;
pub mod matiere;
pub mod question;
pub mod section;
pub mod sujet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::NodeKind;

pub use classe::Classe;
pub use exercice::{Enonce, Exercice, ExerciceQuestion, ExerciceType, SousQuestion};
pub use exercice_video::ExerciceVideo;
pub use lecon::Lecon;
pub use matiere::Matiere;
pub use question::{Difficulty, Question};
pub use section::{Chapitre, Module, Section};
pub use sujet::Sujet;

/// Levels of the tree shown as content cards
pub trait TreeNode {
    const KIND: NodeKind;

    /// Display title (`nom` or `intitule` depending on the level)
    fn title(&self) -> &str;
}

/// A tree level as returned by `get_all` / `get_one`:
/// `{ id, type, title, ...fields }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<T> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: TreeNode> Node<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            kind: T::KIND,
            title: data.title().to_string(),
            data,
        }
    }
}

/// A lesson attachment or exam paper: `{ id, ...fields }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Entry<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self { id: id.into(), data }
    }
}

/// Display index stored either as a number or as the numeric string the
/// admin form used to submit
pub(crate) fn de_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid index {:?}", s))),
    }
}
