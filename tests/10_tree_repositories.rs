mod common;

use std::sync::Arc;

use anyhow::Result;
use lecon_admin::models::{Difficulty, Enonce, Exercice, ExerciceType};
use lecon_admin::repository::{
    ClasseRepository, ExerciceRepository, MatiereRepository, ModuleRepository, RepositoryError,
};
use lecon_admin::store::{DocumentStore, MatiereRef};

#[tokio::test]
async fn classe_matiere_module_scenario() -> Result<()> {
    let store = common::memory_store();
    let classes = ClasseRepository::new(Arc::clone(&store));
    let matieres = MatiereRepository::new(Arc::clone(&store));
    let modules = ModuleRepository::new(Arc::clone(&store));

    classes.add("6e", "Sixième").await?;
    matieres.add("6e", "maths", "Maths", None).await?;
    let maths = MatiereRef::new("6e", "maths");
    let key = modules.add(&maths, "Nombres", 1, None).await?;
    assert_eq!(key, "module-1");

    let all = modules.get_all(&maths).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Nombres");
    assert_eq!(all[0].data.0.index, 1);

    let json = serde_json::to_value(&all[0])?;
    assert_eq!(json["type"], "module");
    assert_eq!(json["intitule"], "Nombres");
    Ok(())
}

#[tokio::test]
async fn deleting_matiere_keeps_its_modules() -> Result<()> {
    let store = common::memory_store();
    let matieres = MatiereRepository::new(Arc::clone(&store));
    let modules = ModuleRepository::new(Arc::clone(&store));
    ClasseRepository::new(Arc::clone(&store)).add("6e", "Sixième").await?;
    matieres.add("6e", "maths", "Maths", None).await?;
    let maths = MatiereRef::new("6e", "maths");
    let key = modules.add(&maths, "Nombres", 1, None).await?;

    matieres.delete("6e", "maths").await?;

    assert!(matches!(
        matieres.get_one("6e", "maths").await,
        Err(RepositoryError::NotFound { .. })
    ));
    let orphan = modules.get_one(&maths, &key).await?;
    assert_eq!(orphan.title, "Nombres");
    Ok(())
}

#[tokio::test]
async fn matiere_rename_without_icon_keeps_icon() -> Result<()> {
    let store = common::memory_store();
    let matieres = MatiereRepository::new(Arc::clone(&store));
    matieres.add("6e", "pc", "Physique", Some("aWNvbg==")).await?;
    matieres.update("6e", "pc", "Physique-Chimie", None).await?;

    let doc = store
        .get_one(&lecon_admin::store::path::matieres_path("6e")?, "pc")
        .await?;
    assert_eq!(doc.get_str("icon"), Some("aWNvbg=="));
    assert_eq!(doc.get_str("nom"), Some("Physique-Chimie"));
    Ok(())
}

#[tokio::test]
async fn classe_names_are_unique() -> Result<()> {
    let classes = ClasseRepository::new(common::memory_store());
    classes.add("6e", "Sixième").await?;
    assert!(matches!(
        classes.add("sixieme", "Sixième").await,
        Err(RepositoryError::Conflict(_))
    ));
    classes.delete("6e").await?;
    classes.add("sixieme", "Sixième").await?;
    assert!(classes.check_class_exists("Sixième", None).await?);
    assert!(!classes.check_class_exists("Sixième", Some("sixieme")).await?);
    Ok(())
}

#[tokio::test]
async fn failed_stamp_does_not_undo_the_write() -> Result<()> {
    let store: Arc<dyn DocumentStore> = common::StampFailingStore::new();
    ClasseRepository::new(Arc::clone(&store)).add("6e", "Sixième").await?;
    let matieres = MatiereRepository::new(Arc::clone(&store));

    matieres.add("6e", "maths", "Maths", None).await?;
    assert_eq!(matieres.get_one("6e", "maths").await?.title, "Maths");
    Ok(())
}

#[tokio::test]
async fn exercice_round_trip_keeps_structure() -> Result<()> {
    let store = common::memory_store();
    let lecon = common::seed_lesson(&store).await?;
    let exercices = ExerciceRepository::new(Arc::clone(&store));

    let mut exercice = Exercice {
        intitule: "Pizza".into(),
        kind: ExerciceType::Ressource,
        niveau: Difficulty::Medium,
        enonce: Enonce {
            texte: "Une pizza est coupée en 8 parts.".into(),
            images: vec!["data:image/png;base64,iVBORw0KGgo=".into()],
        },
        questions: Vec::new(),
        created_at: None,
        updated_at: None,
    };
    let q1 = exercice.add_question("Combien de parts pour la moitié ?", Difficulty::Easy);
    q1.reponse = Some("4".into());
    q1.add_sub_question("Et pour le quart ?", Difficulty::Easy).reponse = Some("2".into());
    q1.add_sub_question("Et pour les trois quarts ?", Difficulty::Medium);
    exercice.add_question("Écrire 3/8 en décimal", Difficulty::Hard);

    let id = exercices.save(&lecon, None, exercice.clone()).await?;

    let stored = exercices.get_one(&lecon, &id).await?.data;
    assert_eq!(stored.enonce, exercice.enonce);
    assert_eq!(stored.questions, exercice.questions);
    assert_eq!(stored.questions[0].sous_questions[1].numero, "1.b");

    let all = exercices.get_all(&lecon).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].data.questions, exercice.questions);
    Ok(())
}
