// handlers/attachments.rs - questions, exercices and video exercises of a lesson

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::handlers::params::{Created, Deleted, LeconItemPath};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Difficulty, Entry, Exercice, ExerciceVideo, Question};
use crate::store::LeconRef;

#[derive(Debug, Deserialize)]
pub struct NiveauQuery {
    pub niveau: Option<Difficulty>,
}

// Questions

pub async fn list_questions(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
) -> ApiResult<Vec<Entry<Question>>> {
    Ok(ApiResponse::success(state.questions.get_all(&lecon).await?))
}

pub async fn create_question(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(question): Json<Question>,
) -> ApiResult<Created> {
    let id = state.questions.save(&lecon, None, question).await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn save_question(
    State(state): State<AppState>,
    Path(path): Path<LeconItemPath>,
    Json(question): Json<Question>,
) -> ApiResult<Created> {
    let id = state
        .questions
        .save(&path.lecon(), Some(&path.item_id), question)
        .await?;
    Ok(ApiResponse::success(Created { id }))
}

pub async fn delete_question(State(state): State<AppState>, Path(path): Path<LeconItemPath>) -> ApiResult<Deleted> {
    state.questions.delete(&path.lecon(), &path.item_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.item_id)))
}

// Exercices

/// GET .../exercices[?niveau=hard]
pub async fn list_exercices(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Query(query): Query<NiveauQuery>,
) -> ApiResult<Vec<Entry<Exercice>>> {
    let exercices = match query.niveau {
        Some(niveau) => state.exercices.get_by_niveau(&lecon, niveau).await?,
        None => state.exercices.get_all(&lecon).await?,
    };
    Ok(ApiResponse::success(exercices))
}

pub async fn create_exercice(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(exercice): Json<Exercice>,
) -> ApiResult<Created> {
    let id = state.exercices.create(&lecon, exercice).await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn get_exercice(
    State(state): State<AppState>,
    Path(path): Path<LeconItemPath>,
) -> ApiResult<Entry<Exercice>> {
    Ok(ApiResponse::success(state.exercices.get_one(&path.lecon(), &path.item_id).await?))
}

pub async fn update_exercice(
    State(state): State<AppState>,
    Path(path): Path<LeconItemPath>,
    Json(exercice): Json<Exercice>,
) -> ApiResult<Entry<Exercice>> {
    let lecon = path.lecon();
    state.exercices.update(&lecon, &path.item_id, exercice).await?;
    Ok(ApiResponse::success(state.exercices.get_one(&lecon, &path.item_id).await?))
}

pub async fn delete_exercice(State(state): State<AppState>, Path(path): Path<LeconItemPath>) -> ApiResult<Deleted> {
    state.exercices.delete(&path.lecon(), &path.item_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.item_id)))
}

// Video exercises

pub async fn list_videos(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
) -> ApiResult<Vec<Entry<ExerciceVideo>>> {
    Ok(ApiResponse::success(state.videos.get_all(&lecon).await?))
}

pub async fn create_video(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(video): Json<ExerciceVideo>,
) -> ApiResult<Created> {
    let id = state.videos.save(&lecon, None, video).await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn save_video(
    State(state): State<AppState>,
    Path(path): Path<LeconItemPath>,
    Json(video): Json<ExerciceVideo>,
) -> ApiResult<Created> {
    let id = state.videos.save(&path.lecon(), Some(&path.item_id), video).await?;
    Ok(ApiResponse::success(Created { id }))
}

pub async fn delete_video(State(state): State<AppState>, Path(path): Path<LeconItemPath>) -> ApiResult<Deleted> {
    state.videos.delete(&path.lecon(), &path.item_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.item_id)))
}
