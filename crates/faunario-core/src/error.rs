//! Error types for the Faunario catalog.
//!
//! One taxonomy covers the whole pipeline: validation and staging problems
//! are recoverable (the batch continues without the offending record),
//! per-record persistence failures are logged and skipped, and a failed
//! database open is fatal to the run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("Could not open catalog database at {path}: {message}")]
    Connectivity { path: PathBuf, message: String },

    #[error("Failed to persist '{name}': {message}")]
    Persistence { name: String, message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Asset file not found: {0}")]
    AssetMissing(PathBuf),

    // Staging errors
    #[error("Staging area does not exist (created it now): {0}")]
    StagingAreaMissing(PathBuf),

    #[error("Staging area is empty: {0}")]
    StagingAreaEmpty(PathBuf),

    #[error("No image file found in staging area: {0}")]
    NoImageFound(PathBuf),

    #[error("No model folder found in staging area: {0}")]
    NoModelFolder(PathBuf),

    // Record errors
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl CatalogError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// True for failures that abort the whole run rather than a single record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::Connectivity { .. } | CatalogError::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::UnknownRegion("Atlantis".into());
        assert_eq!(err.to_string(), "Unknown region: Atlantis");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(CatalogError::Connectivity {
            path: "fauna.db".into(),
            message: "locked".into()
        }
        .is_fatal());
        assert!(!CatalogError::StagingAreaEmpty("staging".into()).is_fatal());
    }
}
