// handlers/mod.rs - HTTP surface of the content tree
//
// Routes mirror the tree: every level is addressed by its ancestors' keys.
// Authentication is handled by the proxy in front of the service.

pub mod attachments;
pub mod classes;
pub mod health;
pub mod lesson_content;
pub mod matieres;
pub mod params;
pub mod sections;
pub mod sujets;

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

use crate::lesson::LessonContentFacade;
use crate::links::{LinkIssuer, LinkValidator};
use crate::repository::{
    Cascade, ChapitreRepository, ClasseRepository, ExerciceRepository, ExerciceVideoRepository,
    LeconRepository, MatiereRepository, ModuleRepository, QuestionRepository, SujetRepository,
};
use crate::store::DocumentStore;

/// Repositories shared by every handler, all built on one store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub classes: ClasseRepository,
    pub matieres: MatiereRepository,
    pub modules: ModuleRepository,
    pub chapitres: ChapitreRepository,
    pub lecons: LeconRepository,
    pub questions: QuestionRepository,
    pub exercices: ExerciceRepository,
    pub videos: ExerciceVideoRepository,
    pub sujets: SujetRepository,
    pub cascade: Cascade,
    pub lesson: LessonContentFacade,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        issuer: Arc<dyn LinkIssuer>,
        validator: Arc<dyn LinkValidator>,
    ) -> Self {
        Self {
            classes: ClasseRepository::new(Arc::clone(&store)),
            matieres: MatiereRepository::new(Arc::clone(&store)),
            modules: ModuleRepository::new(Arc::clone(&store)),
            chapitres: ChapitreRepository::new(Arc::clone(&store)),
            lecons: LeconRepository::new(Arc::clone(&store)),
            questions: QuestionRepository::new(Arc::clone(&store)),
            exercices: ExerciceRepository::new(Arc::clone(&store)),
            videos: ExerciceVideoRepository::new(Arc::clone(&store)),
            sujets: SujetRepository::new(Arc::clone(&store)),
            cascade: Cascade::new(Arc::clone(&store)),
            lesson: LessonContentFacade::new(Arc::clone(&store), issuer, validator),
            store,
        }
    }
}

macro_rules! matiere_route {
    ($suffix:literal) => {
        concat!("/api/classes/:classe_id/matieres/:matiere_id", $suffix)
    };
}

macro_rules! lecon_route {
    ($suffix:literal) => {
        concat!(
            "/api/classes/:classe_id/matieres/:matiere_id/modules/:module_id",
            "/chapitres/:chapitre_id/lecons/:lecon_id",
            $suffix
        )
    };
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(tree_routes())
        .merge(lesson_routes())
        .with_state(state)
}

fn tree_routes() -> Router<AppState> {
    Router::new()
        .route("/api/classes", get(classes::list).post(classes::create))
        .route(
            "/api/classes/:classe_id",
            get(classes::get).put(classes::update).delete(classes::delete),
        )
        .route("/api/class-names/:nom/exists", get(classes::name_exists))
        .route(
            "/api/classes/:classe_id/matieres",
            get(matieres::list).post(matieres::create),
        )
        .route(
            matiere_route!(""),
            get(matieres::get).put(matieres::update).delete(matieres::delete),
        )
        .route(
            matiere_route!("/sujets"),
            get(sujets::list).post(sujets::create),
        )
        .route(
            matiere_route!("/sujets/:sujet_id"),
            put(sujets::update).delete(sujets::delete),
        )
        .route(
            matiere_route!("/modules"),
            get(sections::list_modules).post(sections::create_module),
        )
        .route(
            matiere_route!("/modules/:module_id"),
            get(sections::get_module)
                .put(sections::update_module)
                .delete(sections::delete_module),
        )
        .route(
            matiere_route!("/modules/:module_id/chapitres"),
            get(sections::list_chapitres).post(sections::create_chapitre),
        )
        .route(
            matiere_route!("/modules/:module_id/chapitres/:chapitre_id"),
            get(sections::get_chapitre)
                .put(sections::update_chapitre)
                .delete(sections::delete_chapitre),
        )
        .route(
            matiere_route!("/modules/:module_id/chapitres/:chapitre_id/lecons"),
            get(sections::list_lecons).post(sections::create_lecon),
        )
        .route(
            lecon_route!(""),
            get(sections::get_lecon)
                .put(sections::update_lecon)
                .delete(sections::delete_lecon),
        )
}

fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route(lecon_route!("/content"), get(lesson_content::load_all))
        .route(lecon_route!("/cours"), get(lesson_content::load_course))
        .route(lecon_route!("/cours/regenerate"), post(lesson_content::regenerate))
        .route(lecon_route!("/cours/document"), post(lesson_content::attach))
        .route(lecon_route!("/cours/document-url"), put(lesson_content::set_document_url))
        .route(lecon_route!("/cours/document-handle"), put(lesson_content::set_document_handle))
        .route(lecon_route!("/cours/videos"), put(lesson_content::set_videos))
        .route(
            lecon_route!("/questions"),
            get(attachments::list_questions).post(attachments::create_question),
        )
        .route(
            lecon_route!("/questions/:item_id"),
            put(attachments::save_question).delete(attachments::delete_question),
        )
        .route(
            lecon_route!("/exercices"),
            get(attachments::list_exercices).post(attachments::create_exercice),
        )
        .route(
            lecon_route!("/exercices/:item_id"),
            get(attachments::get_exercice)
                .put(attachments::update_exercice)
                .delete(attachments::delete_exercice),
        )
        .route(
            lecon_route!("/exercices-video"),
            get(attachments::list_videos).post(attachments::create_video),
        )
        .route(
            lecon_route!("/exercices-video/:item_id"),
            put(attachments::save_video).delete(attachments::delete_video),
        )
}
