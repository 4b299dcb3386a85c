// handlers/sections.rs - module, chapitre and lesson handlers
//
// The three indexed levels share one request body; keys come back as
// `{kind}-{index}` and never change afterwards.

use axum::extract::{Path, State};
use axum::Json;

use crate::handlers::params::{Created, Deleted, IndexedBody};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Chapitre, Lecon, Module, Node};
use crate::store::{ChapitreRef, LeconRef, MatiereRef, ModuleRef};

pub async fn list_modules(
    State(state): State<AppState>,
    Path(matiere): Path<MatiereRef>,
) -> ApiResult<Vec<Node<Module>>> {
    Ok(ApiResponse::success(state.modules.get_all(&matiere).await?))
}

pub async fn create_module(
    State(state): State<AppState>,
    Path(matiere): Path<MatiereRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Created> {
    let id = state
        .modules
        .add(&matiere, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn get_module(State(state): State<AppState>, Path(module): Path<ModuleRef>) -> ApiResult<Node<Module>> {
    let node = state.modules.get_one(&module.matiere(), &module.module_id).await?;
    Ok(ApiResponse::success(node))
}

pub async fn update_module(
    State(state): State<AppState>,
    Path(module): Path<ModuleRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Node<Module>> {
    let matiere = module.matiere();
    state
        .modules
        .update(&matiere, &module.module_id, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::success(state.modules.get_one(&matiere, &module.module_id).await?))
}

pub async fn delete_module(State(state): State<AppState>, Path(module): Path<ModuleRef>) -> ApiResult<Deleted> {
    state.modules.delete(&module.matiere(), &module.module_id).await?;
    Ok(ApiResponse::success(Deleted::single(module.module_id)))
}

pub async fn list_chapitres(
    State(state): State<AppState>,
    Path(module): Path<ModuleRef>,
) -> ApiResult<Vec<Node<Chapitre>>> {
    Ok(ApiResponse::success(state.chapitres.get_all(&module).await?))
}

pub async fn create_chapitre(
    State(state): State<AppState>,
    Path(module): Path<ModuleRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Created> {
    let id = state
        .chapitres
        .add(&module, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn get_chapitre(
    State(state): State<AppState>,
    Path(chapitre): Path<ChapitreRef>,
) -> ApiResult<Node<Chapitre>> {
    let node = state
        .chapitres
        .get_one(&chapitre.module(), &chapitre.chapitre_id)
        .await?;
    Ok(ApiResponse::success(node))
}

pub async fn update_chapitre(
    State(state): State<AppState>,
    Path(chapitre): Path<ChapitreRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Node<Chapitre>> {
    let module = chapitre.module();
    state
        .chapitres
        .update(&module, &chapitre.chapitre_id, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::success(state.chapitres.get_one(&module, &chapitre.chapitre_id).await?))
}

pub async fn delete_chapitre(
    State(state): State<AppState>,
    Path(chapitre): Path<ChapitreRef>,
) -> ApiResult<Deleted> {
    state.chapitres.delete(&chapitre.module(), &chapitre.chapitre_id).await?;
    Ok(ApiResponse::success(Deleted::single(chapitre.chapitre_id)))
}

pub async fn list_lecons(
    State(state): State<AppState>,
    Path(chapitre): Path<ChapitreRef>,
) -> ApiResult<Vec<Node<Lecon>>> {
    Ok(ApiResponse::success(state.lecons.get_all(&chapitre).await?))
}

pub async fn create_lecon(
    State(state): State<AppState>,
    Path(chapitre): Path<ChapitreRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Created> {
    let id = state
        .lecons
        .add(&chapitre, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::created(Created { id }))
}

pub async fn get_lecon(State(state): State<AppState>, Path(lecon): Path<LeconRef>) -> ApiResult<Node<Lecon>> {
    Ok(ApiResponse::success(state.lecons.get_one(&lecon).await?))
}

pub async fn update_lecon(
    State(state): State<AppState>,
    Path(lecon): Path<LeconRef>,
    Json(body): Json<IndexedBody>,
) -> ApiResult<Node<Lecon>> {
    state
        .lecons
        .update(&lecon.chapitre(), &lecon.lecon_id, &body.intitule, body.index, body.icon.as_deref())
        .await?;
    Ok(ApiResponse::success(state.lecons.get_one(&lecon).await?))
}

pub async fn delete_lecon(State(state): State<AppState>, Path(lecon): Path<LeconRef>) -> ApiResult<Deleted> {
    state.lecons.delete(&lecon.chapitre(), &lecon.lecon_id).await?;
    Ok(ApiResponse::success(Deleted::single(lecon.lecon_id)))
}
