//! Batch reconciliation: candidates in, validated rows committed, report out.
//!
//! Ordering matters: the description fill runs before validation (a record
//! the operator left without a description would otherwise be rejected for a
//! blank field), validation errors are all reported before any mutation, and
//! the surviving records go through the repository in one batch commit.

use crate::error::Result;
use crate::fs::FileProbe;
use crate::record::CandidateAnimal;
use crate::repository::CatalogRepository;
use crate::summary::SummaryClient;
use crate::validate::RecordValidator;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// What a reconciliation run did.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub candidates: usize,
    pub valid: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Errors that excluded a record before persistence.
    pub validation_errors: Vec<String>,
    /// Per-record persistence failures (logged, batch continued).
    pub persistence_failures: Vec<String>,
}

impl ReconcileReport {
    pub fn rejected(&self) -> usize {
        self.candidates - self.valid
    }
}

/// Validate and persist a candidate batch.
///
/// When a summary client is supplied, candidates with a missing or blank
/// description get one fetched by scientific name (falling back to the
/// placeholder on any lookup failure) before validation runs.
pub async fn reconcile(
    repo: &CatalogRepository,
    project_root: &Path,
    probe: &dyn FileProbe,
    summaries: Option<&SummaryClient>,
    mut candidates: Vec<CandidateAnimal>,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport {
        candidates: candidates.len(),
        ..Default::default()
    };

    // Snapshots read once per batch. Two records sharing a new name in the
    // same batch will therefore both insert; see DESIGN.md.
    let known_regions: HashSet<String> = repo.region_ids()?.into_keys().collect();
    let known_names = repo.known_animal_names()?;

    if let Some(client) = summaries {
        fill_missing_descriptions(&mut candidates, client).await;
    }

    let validator = RecordValidator::new(project_root, probe);
    let outcome = validator.validate(&candidates, &known_regions, &known_names)?;

    for error in &outcome.errors {
        warn!("{}", error);
    }
    report.validation_errors = outcome.errors;
    report.valid = outcome.valid.len();

    if outcome.valid.is_empty() {
        info!("No valid records to persist");
        return Ok(report);
    }

    let batch = repo.upsert_batch(&outcome.valid, &known_names)?;
    report.inserted = batch.inserted;
    report.updated = batch.updated;
    report.persistence_failures = batch.failures;

    info!(
        "Reconciliation done: {} candidates, {} valid, {} inserted, {} updated, {} failed",
        report.candidates,
        report.valid,
        report.inserted,
        report.updated,
        report.persistence_failures.len()
    );
    Ok(report)
}

/// Fill blank or missing descriptions from the encyclopedia, best-effort.
async fn fill_missing_descriptions(candidates: &mut [CandidateAnimal], client: &SummaryClient) {
    for candidate in candidates.iter_mut() {
        let blank = candidate
            .description
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true);
        if !blank {
            continue;
        }

        // The scientific name disambiguates better than the common one.
        let term = candidate
            .scientific_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(candidate.common_name.as_deref());
        let Some(term) = term else {
            continue;
        };

        let text = client.fetch_or_placeholder(term).await;
        info!("Filled description for '{}'", candidate.display_name());
        candidate.description = Some(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFileProbe;
    use crate::schema::ensure_database;
    use tempfile::TempDir;

    fn setup() -> (CatalogRepository, TempDir) {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("data").join("fauna.db");
        ensure_database(&db_path).unwrap();
        let repo = CatalogRepository::open(&db_path).unwrap();
        (repo, temp)
    }

    fn with_assets(root: &Path, name: &str) -> CandidateAnimal {
        let img = format!("img/{}.png", name);
        let model = format!("models/{}/{}.obj", name, name);
        std::fs::create_dir_all(root.join("img")).unwrap();
        std::fs::create_dir_all(root.join("models").join(name)).unwrap();
        std::fs::write(root.join(&img), b"png").unwrap();
        std::fs::write(root.join(&model), b"obj").unwrap();

        CandidateAnimal {
            common_name: Some(name.to_string()),
            scientific_name: Some(format!("{} scientificus", name)),
            description: Some("A fine animal.".to_string()),
            model_path: Some(model),
            image_path: Some(img),
            region_name: Some("Oaxaca".to_string()),
        }
    }

    #[tokio::test]
    async fn test_mixed_batch_persists_only_valid() {
        let (repo, temp) = setup();
        let good = with_assets(temp.path(), "Ajolote");
        let bad = CandidateAnimal {
            common_name: Some("Fantasma".to_string()),
            ..Default::default()
        };

        let report = reconcile(&repo, temp.path(), &OsFileProbe, None, vec![good, bad])
            .await
            .unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.valid, 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.updated, 0);
        assert_eq!(repo.animal_count().unwrap(), 1);
        assert!(report.validation_errors[0].contains("Fantasma"));
    }

    #[tokio::test]
    async fn test_rerun_takes_update_path() {
        let (repo, temp) = setup();
        let candidate = with_assets(temp.path(), "Ajolote");

        let first = reconcile(
            &repo,
            temp.path(),
            &OsFileProbe,
            None,
            vec![candidate.clone()],
        )
        .await
        .unwrap();
        assert_eq!(first.inserted, 1);

        let mut again = candidate;
        again.description = Some("Second pass.".to_string());
        let second = reconcile(&repo, temp.path(), &OsFileProbe, None, vec![again])
            .await
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 1);

        let stored = repo.animals_by_region("Oaxaca").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "Second pass.");
    }

    #[tokio::test]
    async fn test_blank_description_without_client_is_rejected() {
        let (repo, temp) = setup();
        let mut candidate = with_assets(temp.path(), "Ajolote");
        candidate.description = Some("".to_string());

        let report = reconcile(&repo, temp.path(), &OsFileProbe, None, vec![candidate])
            .await
            .unwrap();
        assert_eq!(report.valid, 0);
        assert!(report.validation_errors[0].contains("'description' is present but blank"));
    }
}
