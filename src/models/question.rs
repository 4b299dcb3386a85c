use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty scale shared by quiz questions and exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "easy")]
    Easy,
    #[default]
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "very hard")]
    VeryHard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very hard",
        }
    }
}

/// Multiple-choice quiz question attached to a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub options: Vec<String>,
    /// Position of the right answer in `options`
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    // Older documents carry the misspelt `difficuty` key
    #[serde(default, alias = "difficuty")]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Question {
    pub fn validate(&self) -> Result<(), String> {
        if self.question_text.trim().is_empty() {
            return Err("questionText must not be empty".to_string());
        }
        if self.options.len() < 2 {
            return Err(format!(
                "a question needs at least 2 options, got {}",
                self.options.len()
            ));
        }
        if self.correct_answer >= self.options.len() {
            return Err(format!(
                "correctAnswer {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }
        Ok(())
    }

    /// Empty explanations are stored as absent
    pub(crate) fn normalized(mut self) -> Self {
        self.explanation = self.explanation.filter(|e| !e.trim().is_empty());
        self.last_updated = None;
        self
    }
}
