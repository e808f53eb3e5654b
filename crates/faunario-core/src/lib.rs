//! Faunario Core - headless catalog and maintenance library for a 3D fauna
//! museum.
//!
//! The catalog is a single SQLite file of animals grouped by region, with a
//! filesystem layout of image and 3D-model assets next to it. This crate
//! provides the query surface the browser front-end consumes and the
//! reconciliation pipeline the maintenance CLI drives; presentation (widget
//! tree, mesh rendering) stays behind the capabilities in [`display`].
//!
//! # Example
//!
//! ```rust,ignore
//! use faunario_core::{ensure_database, CatalogRepository};
//!
//! let db = "data/fauna.db";
//! ensure_database(db)?;
//! let repo = CatalogRepository::open(db)?;
//! for region in repo.region_names()? {
//!     let animals = repo.animals_by_region(&region)?;
//!     println!("{}: {} animals", region, animals.len());
//! }
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod fs;
pub mod naming;
pub mod reconcile;
pub mod record;
pub mod repository;
pub mod schema;
pub mod staging;
pub mod summary;
pub mod validate;

// Re-export commonly used types
pub use display::{CatalogView, Mesh, MeshViewer};
pub use error::{CatalogError, Result};
pub use fs::{FileProbe, OsFileProbe};
pub use naming::canonical_name;
pub use reconcile::{reconcile, ReconcileReport};
pub use record::{Animal, AnimalRecord, CandidateAnimal, Region};
pub use repository::{BatchOutcome, CatalogRepository, UpsertAction};
pub use schema::{ensure_database, REGION_NAMES};
pub use staging::{AssetStager, StagedAssets};
pub use summary::{SummaryClient, SummaryError};
pub use validate::{RecordValidator, ValidationOutcome};
