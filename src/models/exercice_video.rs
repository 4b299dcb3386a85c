use serde::{Deserialize, Serialize};

/// Worked exercise published as a YouTube video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciceVideo {
    pub titre: String,
    #[serde(rename = "youtubeUrl")]
    pub youtube_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExerciceVideo {
    /// Blank descriptions are stored as absent
    pub(crate) fn normalized(mut self) -> Self {
        self.description = self.description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.titre.trim().is_empty() {
            return Err("titre must not be empty".to_string());
        }
        url::Url::parse(self.youtube_url.trim())
            .map(|_| ())
            .map_err(|e| format!("youtubeUrl is not a valid URL: {}", e))
    }
}
