// handlers/sujets.rs - past exam papers of a Matière

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::handlers::params::{Created, Deleted, SujetPath};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Entry, Sujet};
use crate::store::MatiereRef;

#[derive(Debug, Deserialize)]
pub struct CreateSujet {
    /// Generated as `sujet_{millis}` when omitted
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub sujet: Sujet,
}

pub async fn list(State(state): State<AppState>, Path(matiere): Path<MatiereRef>) -> ApiResult<Vec<Entry<Sujet>>> {
    Ok(ApiResponse::success(state.sujets.get_all(&matiere).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(matiere): Path<MatiereRef>,
    Json(body): Json<CreateSujet>,
) -> ApiResult<Created> {
    let id = state.sujets.add(&matiere, body.id.as_deref(), body.sujet).await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<SujetPath>,
    Json(sujet): Json<Sujet>,
) -> ApiResult<Created> {
    state.sujets.update(&path.matiere(), &path.sujet_id, sujet).await?;
    Ok(ApiResponse::success(Created { id: path.sujet_id }))
}

pub async fn delete(State(state): State<AppState>, Path(path): Path<SujetPath>) -> ApiResult<Deleted> {
    state.sujets.delete(&path.matiere(), &path.sujet_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.sujet_id)))
}
