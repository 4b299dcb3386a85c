// Lesson Content Facade
//
// Course material lives as fields on the Leçon document; questions,
// exercices and vidéos are sub-collections. This module presents them as a
// single surface and keeps the bot-hosted document link usable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::links::{IssuedLink, LinkError, LinkIssuer, LinkValidator};
use crate::models::lecon::{FIELD_DOC_HANDLE, FIELD_DOC_URL, FIELD_LEGACY_VIDEO_URL, FIELD_VIDEO_URLS};
use crate::models::{Entry, Exercice, ExerciceVideo, Lecon, Question};
use crate::repository::{
    ExerciceRepository, ExerciceVideoRepository, LeconRepository, QuestionRepository, RepositoryError,
};
use crate::store::{DocumentStore, Fields, LeconRef};

/// State of the lesson's course document after the link policy ran
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentState {
    /// No document URL stored
    Absent,
    Available {
        url: String,
        /// Set when the stored link was dead and a new one was issued
        regenerated: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        expires_at: Option<DateTime<Utc>>,
    },
    /// The stored link is dead and there is no handle to issue a new one
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseMaterial {
    pub document: DocumentState,
    pub file_id_doc: Option<String>,
    pub url_cours_videos: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Everything the lesson page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonContent {
    pub course: CourseMaterial,
    pub questions: Vec<Entry<Question>>,
    pub exercices: Vec<Entry<Exercice>>,
    pub exercices_video: Vec<Entry<ExerciceVideo>>,
}

fn validate_url(url: &str) -> Result<(), RepositoryError> {
    url::Url::parse(url)
        .map(|_| ())
        .map_err(|e| RepositoryError::Validation(format!("invalid URL {:?}: {}", url, e)))
}

#[derive(Clone)]
pub struct LessonContentFacade {
    lecons: LeconRepository,
    questions: QuestionRepository,
    exercices: ExerciceRepository,
    videos: ExerciceVideoRepository,
    issuer: Arc<dyn LinkIssuer>,
    validator: Arc<dyn LinkValidator>,
}

impl LessonContentFacade {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        issuer: Arc<dyn LinkIssuer>,
        validator: Arc<dyn LinkValidator>,
    ) -> Self {
        Self {
            lecons: LeconRepository::new(Arc::clone(&store)),
            questions: QuestionRepository::new(Arc::clone(&store)),
            exercices: ExerciceRepository::new(Arc::clone(&store)),
            videos: ExerciceVideoRepository::new(store),
            issuer,
            validator,
        }
    }

    /// Read the course fields and apply the link policy
    ///
    /// A stored URL is checked once. When it is dead and a handle exists a
    /// single new link is issued and persisted; without a handle the
    /// document is reported unavailable.
    pub async fn load_course(&self, lecon: &LeconRef) -> Result<CourseMaterial, RepositoryError> {
        let data = self.lecons.get_one(lecon).await?.data;
        let document = self.document_state(lecon, &data).await?;
        Ok(CourseMaterial {
            document,
            file_id_doc: data.document_handle().map(str::to_string),
            url_cours_videos: data.video_urls(),
            last_updated: data.last_updated,
        })
    }

    async fn document_state(&self, lecon: &LeconRef, data: &Lecon) -> Result<DocumentState, RepositoryError> {
        let Some(url) = data.document_url() else {
            return Ok(DocumentState::Absent);
        };

        let check = self.validator.check(url).await;
        if check.valid {
            return Ok(DocumentState::Available {
                url: url.to_string(),
                regenerated: false,
                expires_at: None,
            });
        }

        match data.document_handle() {
            Some(handle) => {
                info!("Stored document link for {} is dead, issuing a new one", lecon.lecon_id);
                match self.issue_and_store(lecon, handle).await {
                    Ok(link) => Ok(DocumentState::Available {
                        url: link.url,
                        regenerated: true,
                        expires_at: Some(link.expires_at),
                    }),
                    // Issuing is switched off; the rest of the lesson still loads
                    Err(RepositoryError::ExternalService(LinkError::Config(reason))) => {
                        warn!("Document for lesson {} unavailable: {}", lecon.lecon_id, reason);
                        Ok(DocumentState::Unavailable { reason })
                    }
                    Err(e) => Err(e),
                }
            }
            None => {
                let reason = check.error.unwrap_or_else(|| "Link not reachable".to_string());
                warn!("Document for lesson {} unavailable: {}", lecon.lecon_id, reason);
                Ok(DocumentState::Unavailable { reason })
            }
        }
    }

    async fn issue_and_store(&self, lecon: &LeconRef, handle: &str) -> Result<IssuedLink, RepositoryError> {
        let link = self.issuer.issue(handle).await?;
        self.lecons.refresh_document_url(lecon, &link.url).await?;
        Ok(link)
    }

    /// Manual refresh of the document link from the stored handle
    pub async fn regenerate_document_url(&self, lecon: &LeconRef) -> Result<IssuedLink, RepositoryError> {
        let data = self.lecons.get_one(lecon).await?.data;
        let handle = data.document_handle().ok_or_else(|| {
            RepositoryError::Validation(format!("lesson {} has no document handle", lecon.lecon_id))
        })?;
        self.issue_and_store(lecon, handle).await
    }

    /// Record an uploaded document. Without a URL one is issued from the handle.
    pub async fn attach_document(
        &self,
        lecon: &LeconRef,
        handle: &str,
        url: Option<&str>,
    ) -> Result<String, RepositoryError> {
        if handle.trim().is_empty() {
            return Err(RepositoryError::Validation("document handle must not be empty".to_string()));
        }
        let url = match url.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                validate_url(url)?;
                url.to_string()
            }
            None => self.issuer.issue(handle).await?.url,
        };

        let fields = Fields::new()
            .set(FIELD_DOC_HANDLE, handle)
            .set(FIELD_DOC_URL, url.as_str());
        self.lecons.update_course(lecon, fields).await?;
        Ok(url)
    }

    pub async fn set_document_url(&self, lecon: &LeconRef, url: &str) -> Result<(), RepositoryError> {
        validate_url(url)?;
        self.lecons
            .update_course(lecon, Fields::new().set(FIELD_DOC_URL, url))
            .await
    }

    pub async fn set_document_handle(&self, lecon: &LeconRef, handle: &str) -> Result<(), RepositoryError> {
        self.lecons
            .update_course(lecon, Fields::new().set(FIELD_DOC_HANDLE, handle))
            .await
    }

    /// Replace the ordered video list. Blank entries are dropped and the
    /// legacy single-video field is cleared.
    pub async fn set_video_urls(&self, lecon: &LeconRef, urls: Vec<String>) -> Result<Vec<String>, RepositoryError> {
        let urls: Vec<String> = urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        for url in &urls {
            validate_url(url)?;
        }

        let fields = Fields::new()
            .set(FIELD_VIDEO_URLS, urls.clone())
            .set(FIELD_LEGACY_VIDEO_URL, Value::Null);
        self.lecons.update_course(lecon, fields).await?;
        Ok(urls)
    }

    /// Course material plus the three sub-collections, fetched concurrently
    pub async fn load_all(&self, lecon: &LeconRef) -> Result<LessonContent, RepositoryError> {
        let (course, questions, exercices, exercices_video) = futures::try_join!(
            self.load_course(lecon),
            self.questions.get_all(lecon),
            self.exercices.get_all(lecon),
            self.videos.get_all(lecon),
        )?;
        Ok(LessonContent {
            course,
            questions,
            exercices,
            exercices_video,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkCheck;
    use crate::store::{MatiereRef, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedValidator(bool);

    #[async_trait]
    impl LinkValidator for FixedValidator {
        async fn check(&self, _url: &str) -> LinkCheck {
            if self.0 {
                LinkCheck::reachable(200, None, None)
            } else {
                LinkCheck::unreachable(Some(404), "Link not reachable")
            }
        }
    }

    #[derive(Default)]
    struct CountingIssuer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LinkIssuer for CountingIssuer {
        async fn issue(&self, handle: &str) -> Result<IssuedLink, LinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(IssuedLink {
                url: format!("https://files.example/{}.pdf", handle),
                expires_at: Utc::now(),
                file_size: Some(10),
                file_path: format!("{}.pdf", handle),
            })
        }
    }

    async fn lesson(store: &Arc<dyn DocumentStore>) -> LeconRef {
        let chapitre = MatiereRef::new("6e", "maths").module("module-1").chapitre("chapitre-1");
        let key = LeconRepository::new(Arc::clone(store))
            .add(&chapitre, "Fractions", 1, None)
            .await
            .unwrap();
        chapitre.lecon(key)
    }

    #[tokio::test]
    async fn absent_url_skips_validation() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let lecon = lesson(&store).await;
        let issuer = Arc::new(CountingIssuer::default());
        let facade = LessonContentFacade::new(store, issuer.clone(), Arc::new(FixedValidator(false)));

        let course = facade.load_course(&lecon).await.unwrap();
        assert_eq!(course.document, DocumentState::Absent);
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn live_url_is_returned_as_stored() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let lecon = lesson(&store).await;
        let facade = LessonContentFacade::new(
            store,
            Arc::new(CountingIssuer::default()),
            Arc::new(FixedValidator(true)),
        );
        facade.set_document_url(&lecon, "https://files.example/cours.pdf").await.unwrap();

        let course = facade.load_course(&lecon).await.unwrap();
        assert!(matches!(
            course.document,
            DocumentState::Available { regenerated: false, ref url, .. } if url == "https://files.example/cours.pdf"
        ));
    }

    #[tokio::test]
    async fn attach_without_url_issues_one() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let lecon = lesson(&store).await;
        let issuer = Arc::new(CountingIssuer::default());
        let facade = LessonContentFacade::new(store, issuer.clone(), Arc::new(FixedValidator(true)));

        let url = facade.attach_document(&lecon, "BQACAgQ", None).await.unwrap();
        assert_eq!(url, "https://files.example/BQACAgQ.pdf");
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 1);

        let course = facade.load_course(&lecon).await.unwrap();
        assert_eq!(course.file_id_doc.as_deref(), Some("BQACAgQ"));
    }

    #[tokio::test]
    async fn regenerate_requires_a_handle() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let lecon = lesson(&store).await;
        let facade = LessonContentFacade::new(
            store,
            Arc::new(CountingIssuer::default()),
            Arc::new(FixedValidator(true)),
        );
        let err = facade.regenerate_document_url(&lecon).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn video_list_drops_blanks_and_rejects_bad_urls() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let lecon = lesson(&store).await;
        let facade = LessonContentFacade::new(
            store,
            Arc::new(CountingIssuer::default()),
            Arc::new(FixedValidator(true)),
        );

        let saved = facade
            .set_video_urls(&lecon, vec!["https://youtu.be/a".into(), " ".into(), "https://youtu.be/b".into()])
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert!(facade.set_video_urls(&lecon, vec!["nope".into()]).await.is_err());

        let course = facade.load_course(&lecon).await.unwrap();
        assert_eq!(course.url_cours_videos, saved);
        assert!(course.last_updated.is_some());
    }
}
