//! SQLite catalog repository: the query and upsert surface.

use crate::error::{CatalogError, Result};
use crate::record::{Animal, AnimalRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// What an upsert ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Inserted,
    Updated,
}

/// Outcome of a batch upsert: per-record failures do not abort the batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub updated: usize,
    /// One message per record that failed to persist.
    pub failures: Vec<String>,
}

/// The catalog repository.
///
/// Stateless aside from the shared connection; intended for a single process
/// at a time (the interactive browser and the maintenance pipeline are
/// separate invocations that must not overlap).
pub struct CatalogRepository {
    db_path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// Open the catalog database.
    ///
    /// A connection failure here is fatal to the whole operation.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        let conn = Connection::open(&db_path).map_err(|e| CatalogError::Connectivity {
            path: db_path.clone(),
            message: e.to_string(),
        })?;

        Self::configure_connection(&conn)?;

        debug!("Repository connected to {}", db_path.display());
        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Configure connection with the settings every caller expects.
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA busy_timeout=30000;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            ",
        )?;
        Ok(())
    }

    /// Get the database path.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CatalogError::Database {
            message: "Failed to acquire connection lock".to_string(),
            source: None,
        })
    }

    // ========================================
    // Query surface
    // ========================================

    /// All region names, alphabetically ascending.
    pub fn region_names(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM regions ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Animals in one region, ordered by common name.
    ///
    /// An unknown region name yields an empty vec, not an error.
    pub fn animals_by_region(&self, region_name: &str) -> Result<Vec<Animal>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.common_name, a.scientific_name, a.description,
                    a.model_path, a.image_path, r.name
             FROM animals a
             JOIN regions r ON a.region_id = r.id
             WHERE r.name = ?1
             ORDER BY a.common_name ASC",
        )?;
        let rows = stmt.query_map(params![region_name], Self::row_to_animal)?;

        let mut animals = Vec::new();
        for row in rows {
            animals.push(row?);
        }
        Ok(animals)
    }

    /// Filter the catalog by a case-insensitive substring of common name,
    /// scientific name, or region name, grouped by region.
    ///
    /// A blank term returns the full catalog: every region key present, with
    /// an empty vec where a region has no animals. A non-blank term runs one
    /// combined query and only matching regions appear.
    pub fn filter(&self, term: &str) -> Result<BTreeMap<String, Vec<Animal>>> {
        let term = term.trim().to_lowercase();

        if term.is_empty() {
            let mut grouped = BTreeMap::new();
            for region in self.region_names()? {
                let animals = self.animals_by_region(&region)?;
                grouped.insert(region, animals);
            }
            return Ok(grouped);
        }

        let pattern = format!("%{}%", term);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.common_name, a.scientific_name, a.description,
                    a.model_path, a.image_path, r.name
             FROM animals a
             JOIN regions r ON a.region_id = r.id
             WHERE LOWER(a.common_name) LIKE ?1
                OR LOWER(a.scientific_name) LIKE ?1
                OR LOWER(r.name) LIKE ?1
             ORDER BY r.name ASC, a.common_name ASC",
        )?;
        let rows = stmt.query_map(params![pattern], Self::row_to_animal)?;

        let mut grouped: BTreeMap<String, Vec<Animal>> = BTreeMap::new();
        for row in rows {
            let animal = row?;
            grouped.entry(animal.region.clone()).or_default().push(animal);
        }
        Ok(grouped)
    }

    /// Stored image path for one animal, or `None` if the id is unknown.
    pub fn image_path_for(&self, animal_id: i64) -> Result<Option<String>> {
        let conn = self.lock()?;
        let path = conn
            .query_row(
                "SELECT image_path FROM animals WHERE id = ?1",
                params![animal_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(path)
    }

    /// Fetch a single animal by id.
    pub fn animal_by_id(&self, animal_id: i64) -> Result<Option<Animal>> {
        let conn = self.lock()?;
        let animal = conn
            .query_row(
                "SELECT a.id, a.common_name, a.scientific_name, a.description,
                        a.model_path, a.image_path, r.name
                 FROM animals a
                 JOIN regions r ON a.region_id = r.id
                 WHERE a.id = ?1",
                params![animal_id],
                Self::row_to_animal,
            )
            .optional()?;
        Ok(animal)
    }

    /// Count of stored animals.
    pub fn animal_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM animals", [], |row| row.get(0))?;
        Ok(count)
    }

    // ========================================
    // Snapshots for the reconciliation pipeline
    // ========================================

    /// Snapshot of every stored common name.
    ///
    /// Read once per batch; two records in the same batch sharing a new name
    /// will both insert unless the caller refreshes this between records.
    pub fn known_animal_names(&self) -> Result<HashSet<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT common_name FROM animals")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut names = HashSet::new();
        for row in rows {
            names.insert(row?);
        }
        Ok(names)
    }

    /// Snapshot of region name to id.
    pub fn region_ids(&self) -> Result<HashMap<String, i64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name, id FROM regions")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut map = HashMap::new();
        for row in rows {
            let (name, id): (String, i64) = row?;
            map.insert(name, id);
        }
        Ok(map)
    }

    // ========================================
    // Upsert
    // ========================================

    /// Insert or update one validated record.
    ///
    /// The decision is keyed on whether `common_name` appears in the caller's
    /// name snapshot, matching the pipeline's batch-level view of the store.
    pub fn upsert(
        &self,
        record: &AnimalRecord,
        known_names: &HashSet<String>,
    ) -> Result<UpsertAction> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let action = Self::upsert_in(&tx, record, known_names)?;
        tx.commit()?;
        Ok(action)
    }

    /// Upsert a whole validated batch under a single commit.
    ///
    /// A failure on one record is logged and skipped; the rest of the batch
    /// still commits.
    pub fn upsert_batch(
        &self,
        records: &[AnimalRecord],
        known_names: &HashSet<String>,
    ) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for record in records {
            match Self::upsert_in(&tx, record, known_names) {
                Ok(UpsertAction::Inserted) => {
                    debug!("Inserted '{}'", record.common_name);
                    outcome.inserted += 1;
                }
                Ok(UpsertAction::Updated) => {
                    debug!("Updated '{}'", record.common_name);
                    outcome.updated += 1;
                }
                Err(e) => {
                    let failure = CatalogError::Persistence {
                        name: record.common_name.clone(),
                        message: e.to_string(),
                    };
                    warn!("{}", failure);
                    outcome.failures.push(failure.to_string());
                }
            }
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn upsert_in(
        conn: &Connection,
        record: &AnimalRecord,
        known_names: &HashSet<String>,
    ) -> Result<UpsertAction> {
        let region_id: i64 = conn
            .query_row(
                "SELECT id FROM regions WHERE name = ?1",
                params![record.region_name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| CatalogError::UnknownRegion(record.region_name.clone()))?;

        if known_names.contains(&record.common_name) {
            conn.execute(
                "UPDATE animals
                 SET scientific_name = ?1, description = ?2, model_path = ?3,
                     image_path = ?4, region_id = ?5
                 WHERE common_name = ?6",
                params![
                    record.scientific_name,
                    record.description,
                    record.model_path,
                    record.image_path,
                    region_id,
                    record.common_name,
                ],
            )?;
            Ok(UpsertAction::Updated)
        } else {
            conn.execute(
                "INSERT INTO animals
                 (common_name, scientific_name, description, model_path, image_path, region_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.common_name,
                    record.scientific_name,
                    record.description,
                    record.model_path,
                    record.image_path,
                    region_id,
                ],
            )?;
            Ok(UpsertAction::Inserted)
        }
    }

    /// Convert a joined row to an Animal.
    fn row_to_animal(row: &Row) -> rusqlite::Result<Animal> {
        Ok(Animal {
            id: row.get(0)?,
            common_name: row.get(1)?,
            scientific_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            model_path: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            image_path: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            region: row.get(6)?,
        })
    }
}
