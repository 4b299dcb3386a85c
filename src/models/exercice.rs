use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciceType {
    Ressource,
    Competence,
}

/// Exercise statement: rich text plus base64 images
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Enonce {
    pub texte: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SousQuestion {
    /// `{parent}.{letter}`, recomputed from position
    pub numero: String,
    pub texte: String,
    #[serde(default)]
    pub niveau: Difficulty,
    #[serde(default)]
    pub reponse: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciceQuestion {
    pub numero: u32,
    pub texte: String,
    #[serde(default)]
    pub niveau: Difficulty,
    #[serde(default)]
    pub reponse: Option<String>,
    #[serde(rename = "sousQuestions", default)]
    pub sous_questions: Vec<SousQuestion>,
}

/// Structured multi-part exercise attached to a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercice {
    pub intitule: String,
    #[serde(rename = "type")]
    pub kind: ExerciceType,
    pub niveau: Difficulty,
    pub enonce: Enonce,
    pub questions: Vec<ExerciceQuestion>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Letter suffix for the sub-question at `position`: a..z, then aa, ab, ...
pub fn sub_question_letter(position: usize) -> String {
    let mut n = position;
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

impl ExerciceQuestion {
    pub fn new(numero: u32, texte: impl Into<String>, niveau: Difficulty) -> Self {
        Self {
            numero,
            texte: texte.into(),
            niveau,
            reponse: None,
            sous_questions: Vec::new(),
        }
    }

    pub fn add_sub_question(&mut self, texte: impl Into<String>, niveau: Difficulty) -> &mut SousQuestion {
        self.sous_questions.push(SousQuestion {
            numero: String::new(),
            texte: texte.into(),
            niveau,
            reponse: None,
        });
        self.renumber_sub_questions();
        let last = self.sous_questions.len() - 1;
        &mut self.sous_questions[last]
    }

    pub fn remove_sub_question(&mut self, position: usize) -> Option<SousQuestion> {
        if position >= self.sous_questions.len() {
            return None;
        }
        let removed = self.sous_questions.remove(position);
        self.renumber_sub_questions();
        Some(removed)
    }

    pub fn renumber_sub_questions(&mut self) {
        let parent = self.numero;
        for (position, sub) in self.sous_questions.iter_mut().enumerate() {
            sub.numero = format!("{}.{}", parent, sub_question_letter(position));
        }
    }
}

impl Exercice {
    pub fn add_question(&mut self, texte: impl Into<String>, niveau: Difficulty) -> &mut ExerciceQuestion {
        let numero = self.questions.len() as u32 + 1;
        self.questions.push(ExerciceQuestion::new(numero, texte, niveau));
        let last = self.questions.len() - 1;
        &mut self.questions[last]
    }

    pub fn remove_question(&mut self, position: usize) -> Option<ExerciceQuestion> {
        if position >= self.questions.len() {
            return None;
        }
        let removed = self.questions.remove(position);
        self.renumber();
        Some(removed)
    }

    /// Questions are numbered 1..n by position, sub-questions `{n}.{letter}`
    pub fn renumber(&mut self) {
        for (position, question) in self.questions.iter_mut().enumerate() {
            question.numero = position as u32 + 1;
            question.renumber_sub_questions();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.intitule.trim().is_empty() {
            return Err("intitule must not be empty".to_string());
        }
        if self.questions.is_empty() {
            return Err("an exercise needs at least one question".to_string());
        }
        Ok(())
    }

    /// Storage form: consistent numbering, empty answers as null, no timestamps
    pub(crate) fn normalized(mut self) -> Self {
        self.renumber();
        for question in &mut self.questions {
            question.reponse = question.reponse.take().filter(|r| !r.trim().is_empty());
            for sub in &mut question.sous_questions {
                sub.reponse = sub.reponse.take().filter(|r| !r.trim().is_empty());
            }
        }
        self.created_at = None;
        self.updated_at = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question_with_subs(count: usize) -> ExerciceQuestion {
        let mut q = ExerciceQuestion::new(1, "Calculer", Difficulty::Medium);
        for i in 0..count {
            q.add_sub_question(format!("partie {}", i), Difficulty::Easy);
        }
        q
    }

    #[test]
    fn removing_middle_sub_question_renumbers_the_rest() {
        let mut q = question_with_subs(3);
        let numbers: Vec<_> = q.sous_questions.iter().map(|s| s.numero.as_str()).collect();
        assert_eq!(numbers, ["1.a", "1.b", "1.c"]);

        let removed = q.remove_sub_question(1).unwrap();
        assert_eq!(removed.texte, "partie 1");

        let numbers: Vec<_> = q.sous_questions.iter().map(|s| s.numero.as_str()).collect();
        assert_eq!(numbers, ["1.a", "1.b"]);
        assert_eq!(q.sous_questions[1].texte, "partie 2");
    }

    #[test]
    fn removing_question_renumbers_questions_and_their_subs() {
        let mut exercice = Exercice {
            intitule: "Fractions".into(),
            kind: ExerciceType::Ressource,
            niveau: Difficulty::Medium,
            enonce: Enonce::default(),
            questions: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        exercice.add_question("q1", Difficulty::Easy);
        exercice.add_question("q2", Difficulty::Hard).add_sub_question("q2a", Difficulty::Hard);

        exercice.remove_question(0);
        assert_eq!(exercice.questions[0].numero, 1);
        assert_eq!(exercice.questions[0].sous_questions[0].numero, "1.a");
        assert!(exercice.remove_question(5).is_none());
    }

    #[test]
    fn letters_continue_past_z() {
        assert_eq!(sub_question_letter(0), "a");
        assert_eq!(sub_question_letter(25), "z");
        assert_eq!(sub_question_letter(26), "aa");
        assert_eq!(sub_question_letter(27), "ab");
    }

    #[test]
    fn normalized_drops_empty_answers() {
        let exercice: Exercice = serde_json::from_value(json!({
            "intitule": "E",
            "type": "competence",
            "niveau": "hard",
            "enonce": { "texte": "Soit..." },
            "questions": [
                { "numero": 7, "texte": "a", "niveau": "easy", "reponse": "",
                  "sousQuestions": [{ "numero": "x", "texte": "b", "niveau": "easy", "reponse": "42" }] }
            ]
        }))
        .unwrap();
        let stored = exercice.normalized();
        assert_eq!(stored.questions[0].numero, 1);
        assert_eq!(stored.questions[0].reponse, None);
        assert_eq!(stored.questions[0].sous_questions[0].numero, "1.a");
        assert_eq!(stored.questions[0].sous_questions[0].reponse.as_deref(), Some("42"));
        assert!(stored.enonce.images.is_empty());
    }
}
