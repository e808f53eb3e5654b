//! Catalog record types.
//!
//! `CandidateAnimal` is the loose, possibly-incomplete shape operators hand
//! to the maintenance pipeline (every field optional so "missing" is
//! representable). `AnimalRecord` only exists after validation and is the
//! sole type the repository will persist. `Animal` is a stored row as the
//! query surface returns it, with the region name already joined in.

use serde::{Deserialize, Serialize};

/// A region row (Mexican state) used to group animals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub name: String,
}

/// A stored animal as returned by catalog queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub model_path: String,
    pub image_path: String,
    /// Joined region name, not the foreign key.
    pub region: String,
}

/// A candidate record before validation.
///
/// Deserialized from the operator-supplied JSON array; any field may be
/// absent, and no field is dereferenced until the validator has run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CandidateAnimal {
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub model_path: Option<String>,
    pub image_path: Option<String>,
    pub region_name: Option<String>,
}

impl CandidateAnimal {
    /// The name used in operator-facing error messages.
    pub fn display_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or("<missing name>")
    }
}

/// A validated record, eligible for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub model_path: String,
    pub image_path: String,
    pub region_name: String,
}
