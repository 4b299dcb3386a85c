/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of document in the content tree
/// The serialized form is the `type` tag the content-card UI switches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Classe,
    Matiere,
    Module,
    Chapitre,
    Lesson,
    Question,
    Exercice,
    ExerciceVideo,
    Sujet,
}

impl NodeKind {
    /// Collection name under the parent document
    pub fn collection(&self) -> &'static str {
        match self {
            NodeKind::Classe => "classes",
            NodeKind::Matiere => "matieres",
            NodeKind::Module => "modules",
            NodeKind::Chapitre => "chapitres",
            NodeKind::Lesson => "lecons",
            NodeKind::Question => "questions",
            NodeKind::Exercice => "exercices",
            NodeKind::ExerciceVideo => "exercices_video",
            NodeKind::Sujet => "sujets",
        }
    }

    /// Levels whose keys are derived from their display index
    pub fn is_indexed(&self) -> bool {
        matches!(self, NodeKind::Module | NodeKind::Chapitre | NodeKind::Lesson)
    }

    /// Derived document key (`module-3`, `chapitre-1`, `lesson-12`)
    /// Returns None for levels with user-supplied or store-assigned keys
    pub fn derived_key(&self, index: u32) -> Option<String> {
        if !self.is_indexed() {
            return None;
        }
        Some(format!("{}-{}", self.as_str(), index))
    }

    /// Whether mutations of this kind bump the owning Classe's `lastUpdate`
    pub fn propagates_last_update(&self) -> bool {
        matches!(
            self,
            NodeKind::Matiere
                | NodeKind::Module
                | NodeKind::Chapitre
                | NodeKind::Lesson
                | NodeKind::Sujet
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Classe => "classe",
            NodeKind::Matiere => "matiere",
            NodeKind::Module => "module",
            NodeKind::Chapitre => "chapitre",
            NodeKind::Lesson => "lesson",
            NodeKind::Question => "question",
            NodeKind::Exercice => "exercice",
            NodeKind::ExerciceVideo => "exercice_video",
            NodeKind::Sujet => "sujet",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
