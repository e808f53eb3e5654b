//! Candidate record validation.
//!
//! Pure over its inputs plus an injected file-existence capability: nothing
//! here mutates the store or the filesystem. Valid records come out in input
//! order; a failed record can contribute several error strings, each tagged
//! with its 1-based position and name.

use crate::error::{CatalogError, Result};
use crate::fs::FileProbe;
use crate::record::{AnimalRecord, CandidateAnimal};
use std::collections::HashSet;
use std::path::PathBuf;

/// Result of validating a candidate batch.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// Records that passed every applicable check, in input order.
    pub valid: Vec<AnimalRecord>,
    /// Operator-readable error strings for everything that failed.
    pub errors: Vec<String>,
}

/// Validates candidate records against the known region set, the known name
/// set, and asset existence on disk.
pub struct RecordValidator<'a> {
    project_root: PathBuf,
    probe: &'a dyn FileProbe,
}

impl<'a> RecordValidator<'a> {
    /// # Arguments
    ///
    /// * `project_root` - Directory that asset paths are resolved against
    /// * `probe` - File-existence capability (real filesystem in production)
    pub fn new(project_root: impl Into<PathBuf>, probe: &'a dyn FileProbe) -> Self {
        Self {
            project_root: project_root.into(),
            probe,
        }
    }

    /// Validate a batch of candidates.
    ///
    /// A `common_name` already present in `known_names` is not a failure; it
    /// marks the record for the update path instead of insert.
    pub fn validate(
        &self,
        candidates: &[CandidateAnimal],
        known_regions: &HashSet<String>,
        known_names: &HashSet<String>,
    ) -> Result<ValidationOutcome> {
        let mut outcome = ValidationOutcome::default();

        for (i, candidate) in candidates.iter().enumerate() {
            let tag = format!("Animal #{} ('{}')", i + 1, candidate.display_name());
            let mut ok = true;

            // Present-but-blank fields fail regardless of which field it is.
            for (field, value) in Self::present_fields(candidate) {
                if value.trim().is_empty() {
                    outcome.errors.push(format!(
                        "{}: field '{}' is present but blank",
                        tag, field
                    ));
                    ok = false;
                }
            }

            // With any field missing there is nothing safe left to check.
            let missing = Self::missing_fields(candidate);
            if !missing.is_empty() {
                outcome
                    .errors
                    .push(format!("{}: missing fields: {}", tag, missing.join(", ")));
                continue;
            }

            let region_name = candidate.region_name.as_deref().unwrap_or_default();
            if !known_regions.contains(region_name) {
                outcome.errors.push(format!(
                    "{}: region '{}' does not exist in the catalog",
                    tag, region_name
                ));
                ok = false;
            }

            for rel in [
                candidate.image_path.as_deref().unwrap_or_default(),
                candidate.model_path.as_deref().unwrap_or_default(),
            ] {
                if !self.asset_exists(rel) {
                    let err = CatalogError::AssetMissing(PathBuf::from(rel));
                    outcome.errors.push(format!("{}: {}", tag, err));
                    ok = false;
                }
            }

            if ok {
                if known_names.contains(candidate.display_name()) {
                    tracing::debug!("{}: name already stored, will update", tag);
                }
                outcome.valid.push(Self::into_record(candidate));
            }
        }

        Ok(outcome)
    }

    fn asset_exists(&self, relative: &str) -> bool {
        self.probe.exists(&self.project_root.join(relative))
    }

    /// Field names paired with their values, in the record's declared order.
    fn fields(candidate: &CandidateAnimal) -> [(&'static str, &Option<String>); 6] {
        [
            ("common_name", &candidate.common_name),
            ("scientific_name", &candidate.scientific_name),
            ("description", &candidate.description),
            ("model_path", &candidate.model_path),
            ("image_path", &candidate.image_path),
            ("region_name", &candidate.region_name),
        ]
    }

    fn present_fields(candidate: &CandidateAnimal) -> Vec<(&'static str, &str)> {
        Self::fields(candidate)
            .into_iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
            .collect()
    }

    fn missing_fields(candidate: &CandidateAnimal) -> Vec<&'static str> {
        Self::fields(candidate)
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    /// Only called once every field is known present.
    fn into_record(candidate: &CandidateAnimal) -> AnimalRecord {
        AnimalRecord {
            common_name: candidate.common_name.clone().unwrap_or_default(),
            scientific_name: candidate.scientific_name.clone().unwrap_or_default(),
            description: candidate.description.clone().unwrap_or_default(),
            model_path: candidate.model_path.clone().unwrap_or_default(),
            image_path: candidate.image_path.clone().unwrap_or_default(),
            region_name: candidate.region_name.clone().unwrap_or_default(),
        }
    }
}
