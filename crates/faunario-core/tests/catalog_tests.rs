//! End-to-end catalog tests: schema seed, staging, reconciliation, queries.

use faunario_core::{
    ensure_database, reconcile, AssetStager, CandidateAnimal, CatalogRepository, OsFileProbe,
};
use std::path::Path;
use tempfile::TempDir;

fn open_repo(root: &Path) -> CatalogRepository {
    let db_path = root.join("data").join("fauna.db");
    ensure_database(&db_path).unwrap();
    CatalogRepository::open(&db_path).unwrap()
}

/// Put one image and one model folder into the staging area.
fn populate_staging(root: &Path) {
    let staging = root.join("staging");
    std::fs::create_dir_all(&staging).unwrap();
    std::fs::write(staging.join("foto.png"), b"png").unwrap();
    let folder = staging.join("export");
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(folder.join("mesh.obj"), b"obj").unwrap();
}

fn candidate(name: &str, region: &str, image: &str, model: &str) -> CandidateAnimal {
    CandidateAnimal {
        common_name: Some(name.to_string()),
        scientific_name: Some(format!("{} scientificus", name)),
        description: Some(format!("Notes on {}.", name)),
        model_path: Some(model.to_string()),
        image_path: Some(image.to_string()),
        region_name: Some(region.to_string()),
    }
}

#[tokio::test]
async fn test_stage_then_reconcile_then_browse() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let repo = open_repo(root);

    // Operator drops assets into staging, runs the stager.
    populate_staging(root);
    let staged = AssetStager::new(root).stage("Ajolote").unwrap();
    assert_eq!(staged.image_path, "img/ajolote.png");
    assert_eq!(staged.model_path, "models/ajolote/ajolote.obj");

    // The staged paths go straight into a candidate record.
    let record = candidate("Ajolote", "Oaxaca", &staged.image_path, &staged.model_path);
    let report = reconcile(&repo, root, &OsFileProbe, None, vec![record])
        .await
        .unwrap();
    assert_eq!(report.inserted, 1);
    assert!(report.validation_errors.is_empty());

    // Spec scenario: Oaxaca has the ajolote, Jalisco has nothing.
    let oaxaca = repo.animals_by_region("Oaxaca").unwrap();
    assert_eq!(oaxaca.len(), 1);
    assert_eq!(oaxaca[0].common_name, "Ajolote");
    assert!(repo.animals_by_region("Jalisco").unwrap().is_empty());

    // Detail view lookups.
    let id = oaxaca[0].id;
    assert_eq!(
        repo.image_path_for(id).unwrap().as_deref(),
        Some("img/ajolote.png")
    );
    assert_eq!(
        repo.animal_by_id(id).unwrap().unwrap().model_path,
        "models/ajolote/ajolote.obj"
    );
}

#[tokio::test]
async fn test_blank_filter_equals_full_enumeration() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let repo = open_repo(root);

    populate_staging(root);
    let staged = AssetStager::new(root).stage("Vaquita marina").unwrap();
    let record = candidate(
        "Vaquita marina",
        "Baja California",
        &staged.image_path,
        &staged.model_path,
    );
    reconcile(&repo, root, &OsFileProbe, None, vec![record])
        .await
        .unwrap();

    let filtered = repo.filter("").unwrap();

    // Same grouping as enumerating every region and its animals.
    let regions = repo.region_names().unwrap();
    assert_eq!(filtered.len(), regions.len());
    for region in &regions {
        let direct = repo.animals_by_region(region).unwrap();
        let from_filter = &filtered[region];
        assert_eq!(direct.len(), from_filter.len());
        for (a, b) in direct.iter().zip(from_filter.iter()) {
            assert_eq!(a.id, b.id);
        }
    }
}

#[tokio::test]
async fn test_restaging_same_name_converges() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    populate_staging(root);
    let first = AssetStager::new(root).stage("Jaguar").unwrap();

    // Same animal staged again with fresh files: old folder is replaced.
    populate_staging(root);
    let second = AssetStager::new(root).stage("Jaguar").unwrap();

    assert_eq!(first, second);
    assert!(root.join("models/jaguar/jaguar.obj").exists());
}

#[tokio::test]
async fn test_batch_reconcile_reports_each_failure() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let repo = open_repo(root);

    populate_staging(root);
    let staged = AssetStager::new(root).stage("Ajolote").unwrap();

    let good = candidate("Ajolote", "Oaxaca", &staged.image_path, &staged.model_path);
    let bad_region = candidate("Jaguar", "Atlantis", &staged.image_path, &staged.model_path);
    let bad_assets = candidate("Tucán", "Chiapas", "img/nope.png", "models/nope/nope.obj");
    let incomplete = CandidateAnimal::default();

    let report = reconcile(
        &repo,
        root,
        &OsFileProbe,
        None,
        vec![good, bad_region, bad_assets, incomplete],
    )
    .await
    .unwrap();

    assert_eq!(report.candidates, 4);
    assert_eq!(report.valid, 1);
    assert_eq!(report.inserted, 1);
    // One error per failed check: unknown region, two missing assets,
    // one missing-fields summary line.
    assert_eq!(report.validation_errors.len(), 4);
    assert_eq!(repo.animal_count().unwrap(), 1);
}
