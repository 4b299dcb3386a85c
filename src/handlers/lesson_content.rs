// handlers/lesson_content.rs - course material of a lesson
//
// GET runs the link policy, so a dead bot link may be replaced (and
// persisted) while serving the read.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;
use crate::lesson::{CourseMaterial, LessonContent};
use crate::links::IssuedLink;
use crate::middleware::{ApiResponse, ApiResult};
use crate::store::LeconRef;

#[derive(Debug, Deserialize)]
pub struct DocumentUrlBody {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentHandleBody {
    pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachBody {
    pub file_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoUrlsBody {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentUrl {
    pub url: String,
}

/// GET .../lecons/:lecon_id/content - course material and every attachment
pub async fn load_all(State(state): State<AppState>, Path(lecon): Path<LeconRef>) -> ApiResult<LessonContent> {
    Ok(ApiResponse::success(state.lesson.load_all(&lecon).await?))
}

/// GET .../lecons/:lecon_id/cours
pub async fn load_course(State(state): State<AppState>, Path(lecon): Path<LeconRef>) -> ApiResult<CourseMaterial> {
    Ok(ApiResponse::success(state.lesson.load_course(&lecon).await?))
}

/// POST .../cours/regenerate - issue a new link from the stored handle
pub async fn regenerate(State(state): State<AppState>, Path(lecon): Path<LeconRef>) -> ApiResult<IssuedLink> {
    Ok(ApiResponse::success(state.lesson.regenerate_document_url(&lecon).await?))
}

/// POST .../cours/document - record an uploaded file
pub async fn attach(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(body): Json<AttachBody>,
) -> ApiResult<DocumentUrl> {
    let url = state
        .lesson
        .attach_document(&lecon, &body.file_id, body.url.as_deref())
        .await?;
    Ok(ApiResponse::created(DocumentUrl { url }))
}

/// PUT .../cours/document-url
pub async fn set_document_url(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(body): Json<DocumentUrlBody>,
) -> ApiResult<CourseMaterial> {
    state.lesson.set_document_url(&lecon, body.url.trim()).await?;
    Ok(ApiResponse::success(state.lesson.load_course(&lecon).await?))
}

/// PUT .../cours/document-handle
pub async fn set_document_handle(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(body): Json<DocumentHandleBody>,
) -> ApiResult<()> {
    state.lesson.set_document_handle(&lecon, body.file_id.trim()).await?;
    Ok(ApiResponse::no_content())
}

/// PUT .../cours/videos
pub async fn set_videos(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(body): Json<VideoUrlsBody>,
) -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(state.lesson.set_video_urls(&lecon, body.urls).await?))
}
