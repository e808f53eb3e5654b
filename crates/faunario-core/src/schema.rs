//! Schema creation and region seeding.
//!
//! Runs once, guarded by "database file absent". The region list is fixed at
//! seed time and never mutated afterward.

use crate::error::{CatalogError, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

/// The fixed set of region names seeded at initialization.
pub const REGION_NAMES: &[&str] = &[
    "Aguascalientes",
    "Baja California",
    "Baja California Sur",
    "Campeche",
    "Chiapas",
    "Chihuahua",
    "Ciudad de México",
    "Coahuila",
    "Colima",
    "Durango",
    "Guanajuato",
    "Guerrero",
    "Hidalgo",
    "Jalisco",
    "México",
    "Michoacán",
    "Morelos",
    "Nayarit",
    "Nuevo León",
    "Oaxaca",
    "Puebla",
    "Querétaro",
    "Quintana Roo",
    "San Luis Potosí",
    "Sinaloa",
    "Sonora",
    "Tabasco",
    "Tamaulipas",
    "Tlaxcala",
    "Veracruz",
    "Yucatán",
    "Zacatecas",
];

/// Create the database file, schema, and region seed if the file is absent.
///
/// Returns `true` if the database was created, `false` if it already existed.
/// Note `common_name` carries no UNIQUE constraint: the canonical-name key is
/// approximated by the pipeline's name-set snapshot, not enforced here.
pub fn ensure_database(db_path: impl AsRef<Path>) -> Result<bool> {
    let db_path = db_path.as_ref();
    if db_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::io_with_path(e, parent))?;
        }
    }

    let conn = Connection::open(db_path).map_err(|e| CatalogError::Connectivity {
        path: db_path.to_path_buf(),
        message: e.to_string(),
    })?;

    create_schema(&conn)?;
    seed_regions(&conn)?;

    info!("Created catalog database at {}", db_path.display());
    Ok(true)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE regions (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL UNIQUE
         );
         CREATE TABLE animals (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             common_name TEXT NOT NULL,
             scientific_name TEXT,
             description TEXT,
             model_path TEXT,
             image_path TEXT,
             region_id INTEGER NOT NULL,
             FOREIGN KEY (region_id) REFERENCES regions(id)
         );
         CREATE INDEX idx_animals_region ON animals(region_id);
         CREATE INDEX idx_animals_common_name ON animals(common_name);",
    )?;
    Ok(())
}

fn seed_regions(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("INSERT INTO regions (name) VALUES (?1)")?;
    for name in REGION_NAMES {
        stmt.execute(params![name])?;
    }
    info!("Seeded {} regions", REGION_NAMES.len());
    Ok(())
}
