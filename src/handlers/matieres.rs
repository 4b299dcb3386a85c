// handlers/matieres.rs - /api/classes/:classe_id/matieres handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::handlers::params::{ClassePath, Created, DeleteQuery, Deleted};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Matiere, Node};
use crate::store::MatiereRef;

#[derive(Debug, Deserialize)]
pub struct CreateMatiere {
    pub id: String,
    pub nom: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatiere {
    pub nom: String,
    /// Omitted or empty keeps the stored icon
    #[serde(default)]
    pub icon: Option<String>,
}

pub async fn list(State(state): State<AppState>, Path(path): Path<ClassePath>) -> ApiResult<Vec<Node<Matiere>>> {
    Ok(ApiResponse::success(state.matieres.get_all(&path.classe_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path): Path<ClassePath>,
    Json(body): Json<CreateMatiere>,
) -> ApiResult<Created> {
    state
        .matieres
        .add(&path.classe_id, &body.id, &body.nom, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::created(Created {
        id: body.id.trim().to_string(),
    }))
}

pub async fn get(State(state): State<AppState>, Path(path): Path<MatiereRef>) -> ApiResult<Node<Matiere>> {
    let matiere = state.matieres.get_one(&path.classe_id, &path.matiere_id).await?;
    Ok(ApiResponse::success(matiere))
}

pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<MatiereRef>,
    Json(body): Json<UpdateMatiere>,
) -> ApiResult<Node<Matiere>> {
    state
        .matieres
        .update(&path.classe_id, &path.matiere_id, &body.nom, body.icon.as_deref())
        .await?;
    let matiere = state.matieres.get_one(&path.classe_id, &path.matiere_id).await?;
    Ok(ApiResponse::success(matiere))
}

/// DELETE leaves modules and sujets in place unless `cascade=true`
pub async fn delete(
    State(state): State<AppState>,
    Path(path): Path<MatiereRef>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Deleted> {
    if query.cascade {
        let removed = state.cascade.delete_matiere_subtree(&path).await?;
        return Ok(ApiResponse::success(Deleted {
            id: path.matiere_id,
            removed,
        }));
    }
    state.matieres.delete(&path.classe_id, &path.matiere_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.matiere_id)))
}
