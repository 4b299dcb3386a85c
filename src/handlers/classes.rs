// handlers/classes.rs - /api/classes and /api/class-names handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::handlers::params::{ClassePath, Created, DeleteQuery, Deleted};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Classe, Node};

#[derive(Debug, Deserialize)]
pub struct CreateClasse {
    pub id: String,
    pub nom: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameClasse {
    pub nom: String,
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Exists {
    pub exists: bool,
}

/// GET /api/classes - List every Classe
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Node<Classe>>> {
    Ok(ApiResponse::success(state.classes.get_all().await?))
}

/// POST /api/classes - Create a Classe under a caller-chosen key
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateClasse>,
) -> ApiResult<Created> {
    state.classes.add(&body.id, &body.nom).await?;
    Ok(ApiResponse::created(Created {
        id: body.id.trim().to_string(),
    }))
}

/// GET /api/classes/:classe_id
pub async fn get(State(state): State<AppState>, Path(path): Path<ClassePath>) -> ApiResult<Node<Classe>> {
    Ok(ApiResponse::success(state.classes.get_one(&path.classe_id).await?))
}

/// PUT /api/classes/:classe_id - Rename
pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<ClassePath>,
    Json(body): Json<RenameClasse>,
) -> ApiResult<Node<Classe>> {
    state.classes.update(&path.classe_id, &body.nom).await?;
    Ok(ApiResponse::success(state.classes.get_one(&path.classe_id).await?))
}

/// DELETE /api/classes/:classe_id[?cascade=true]
pub async fn delete(
    State(state): State<AppState>,
    Path(path): Path<ClassePath>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Deleted> {
    if query.cascade {
        let removed = state.cascade.delete_classe_subtree(&path.classe_id).await?;
        return Ok(ApiResponse::success(Deleted {
            id: path.classe_id,
            removed,
        }));
    }
    state.classes.delete(&path.classe_id).await?;
    Ok(ApiResponse::success(Deleted::single(path.classe_id)))
}

/// GET /api/class-names/:nom/exists[?exclude=key]
pub async fn name_exists(
    State(state): State<AppState>,
    Path(nom): Path<String>,
    Query(query): Query<ExistsQuery>,
) -> ApiResult<Exists> {
    let exists = state
        .classes
        .check_class_exists(&nom, query.exclude.as_deref())
        .await?;
    Ok(ApiResponse::success(Exists { exists }))
}
