use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{de_index, TreeNode};
use crate::types::NodeKind;

pub const FIELD_DOC_URL: &str = "url_cours_doc";
pub const FIELD_DOC_HANDLE: &str = "file_id_doc";
pub const FIELD_VIDEO_URLS: &str = "url_cours_videos";
pub const FIELD_LAST_UPDATED: &str = "last_updated";
/// Single-video field written by older versions of the console
pub const FIELD_LEGACY_VIDEO_URL: &str = "url_cours_video";

/// Lesson document, including its course material fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecon {
    pub intitule: String,
    #[serde(deserialize_with = "de_index")]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Download link issued by the file-hosting bot; may be stale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_cours_doc: Option<String>,
    /// Bot file handle used to issue a fresh link for `url_cours_doc`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id_doc: Option<String>,
    #[serde(default)]
    pub url_cours_videos: Vec<String>,
    #[serde(default, skip_serializing)]
    url_cours_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Lecon {
    pub fn new(intitule: impl Into<String>, index: u32) -> Self {
        Self {
            intitule: intitule.into(),
            index,
            icon: None,
            url_cours_doc: None,
            file_id_doc: None,
            url_cours_videos: Vec::new(),
            url_cours_video: None,
            last_updated: None,
        }
    }

    /// Ordered course videos. A legacy single video is returned as a
    /// one-element list when no list has been stored yet.
    pub fn video_urls(&self) -> Vec<String> {
        if !self.url_cours_videos.is_empty() {
            return self.url_cours_videos.clone();
        }
        self.url_cours_video
            .iter()
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn document_url(&self) -> Option<&str> {
        self.url_cours_doc.as_deref().filter(|s| !s.is_empty())
    }

    pub fn document_handle(&self) -> Option<&str> {
        self.file_id_doc.as_deref().filter(|s| !s.is_empty())
    }
}

impl TreeNode for Lecon {
    const KIND: NodeKind = NodeKind::Lesson;

    fn title(&self) -> &str {
        &self.intitule
    }
}
