#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Query;
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;

use lecon_admin::links::{IssuedLink, LinkCheck, LinkError, LinkIssuer, LinkValidator};
use lecon_admin::repository::{
    ChapitreRepository, ClasseRepository, LeconRepository, MatiereRepository, ModuleRepository,
};
use lecon_admin::store::{Document, DocumentStore, Fields, LeconRef, MatiereRef, MemoryStore, StoreError, TreePath};

pub const BOT_TOKEN: &str = "TEST_TOKEN";
pub const GOOD_HANDLE: &str = "BQACAgQAAxkBAAIB";
pub const GOOD_FILE_PATH: &str = "documents/file_1.pdf";
pub const FILE_BYTES: &[u8] = b"%PDF-1.4 test";

pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

/// 6e / maths / module-1 / chapitre-1 / lesson-1
pub async fn seed_lesson(store: &Arc<dyn DocumentStore>) -> Result<LeconRef> {
    ClasseRepository::new(Arc::clone(store)).add("6e", "Sixième").await?;
    MatiereRepository::new(Arc::clone(store))
        .add("6e", "maths", "Maths", None)
        .await?;
    let matiere = MatiereRef::new("6e", "maths");
    let module_id = ModuleRepository::new(Arc::clone(store))
        .add(&matiere, "Nombres", 1, None)
        .await?;
    let module = matiere.module(module_id);
    let chapitre_id = ChapitreRepository::new(Arc::clone(store))
        .add(&module, "Fractions", 1, None)
        .await?;
    let chapitre = module.chapitre(chapitre_id);
    let lecon_id = LeconRepository::new(Arc::clone(store))
        .add(&chapitre, "Additionner des fractions", 1, None)
        .await?;
    Ok(chapitre.lecon(lecon_id))
}

/// Validator answering a fixed verdict and counting calls
pub struct ScriptedValidator {
    valid: bool,
    pub calls: AtomicUsize,
}

impl ScriptedValidator {
    pub fn new(valid: bool) -> Arc<Self> {
        Arc::new(Self {
            valid,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkValidator for ScriptedValidator {
    async fn check(&self, _url: &str) -> LinkCheck {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.valid {
            LinkCheck::reachable(200, Some(1024), Some("application/pdf".into()))
        } else {
            LinkCheck::unreachable(Some(404), "Link not reachable")
        }
    }
}

/// Issuer returning `https://files.test/{handle}` or a canned API error
pub struct ScriptedIssuer {
    fail: bool,
    pub calls: AtomicUsize,
}

impl ScriptedIssuer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkIssuer for ScriptedIssuer {
    async fn issue(&self, handle: &str) -> Result<IssuedLink, LinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LinkError::Api {
                description: "Bad Request: invalid file_id".into(),
            });
        }
        Ok(IssuedLink {
            url: format!("https://files.test/{}", handle),
            expires_at: Utc::now() + Duration::hours(1),
            file_size: Some(1024),
            file_path: format!("documents/{}.pdf", handle),
        })
    }
}

/// Memory store whose writes to the `classes` collection via
/// `update_fields` always fail, as a lost connection would
pub struct StampFailingStore {
    inner: MemoryStore,
}

impl StampFailingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
        })
    }
}

#[async_trait]
impl DocumentStore for StampFailingStore {
    async fn get_one(&self, path: &TreePath, id: &str) -> Result<Document, StoreError> {
        self.inner.get_one(path, id).await
    }

    async fn get_all_children(&self, path: &TreePath) -> Result<Vec<Document>, StoreError> {
        self.inner.get_all_children(path).await
    }

    async fn set_document(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.inner.set_document(path, id, fields).await
    }

    async fn update_fields(&self, path: &TreePath, id: &str, fields: Fields) -> Result<(), StoreError> {
        if *path == TreePath::classes() {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        self.inner.update_fields(path, id, fields).await
    }

    async fn delete_one(&self, path: &TreePath, id: &str) -> Result<(), StoreError> {
        self.inner.delete_one(path, id).await
    }
}

#[derive(Deserialize)]
struct GetFileQuery {
    file_id: String,
}

/// Local stand-in for the bot file API on a free port
pub struct BotServer {
    pub base_url: String,
}

pub async fn spawn_bot_api() -> Result<BotServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let get_file = |Query(q): Query<GetFileQuery>| async move {
        if q.file_id == GOOD_HANDLE {
            Json(json!({
                "ok": true,
                "result": { "file_id": q.file_id, "file_path": GOOD_FILE_PATH, "file_size": FILE_BYTES.len() }
            }))
        } else {
            Json(json!({ "ok": false, "error_code": 400, "description": "Bad Request: invalid file_id" }))
        }
    };

    let app = Router::new()
        .route(&format!("/bot{}/getFile", BOT_TOKEN), get(get_file))
        .route(
            &format!("/file/bot{}/{}", BOT_TOKEN, GOOD_FILE_PATH),
            get(|| async { ([("content-type", "application/pdf")], FILE_BYTES) }),
        )
        .route("/expired.pdf", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind bot api stub")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(BotServer { base_url })
}

/// Drive the router in-process and decode the JSON body (Null when empty)
pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}
