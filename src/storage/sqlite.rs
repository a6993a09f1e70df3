//! SQLite storage implementation
//!
//! This module provides the SQLite-backed [`RecordSink`] used by the crawler.

use crate::config::StorageConfig;
use crate::record::MovieRecord;
use crate::storage::pool::{build_pool, PoolStatus, SqlitePool};
use crate::storage::schema::{initialize_schema, INSERT_SQL, MOVIES_TABLE};
use crate::storage::traits::{RecordSink, StorageError, StorageResult};
use crate::HarvestError;
use rusqlite::params_from_iter;
use std::path::Path;

/// SQLite storage backend
///
/// Holds a bounded connection pool; share it between workers behind an `Arc`.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (or creates) the database with the default pool bounds
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let defaults = StorageConfig::default();
        Self::with_pool_limits(
            path,
            defaults.max_open_connections,
            defaults.max_idle_connections,
        )
    }

    /// Opens the database described by a storage config section
    pub fn from_config(config: &StorageConfig) -> Result<Self, HarvestError> {
        Self::with_pool_limits(
            Path::new(&config.database_path),
            config.max_open_connections,
            config.max_idle_connections,
        )
    }

    /// Opens the database with explicit pool bounds and ensures the schema
    pub fn with_pool_limits(
        path: &Path,
        max_open: u32,
        max_idle: u32,
    ) -> Result<Self, HarvestError> {
        let pool = build_pool(path, max_open, max_idle)?;

        {
            let conn = pool.get().map_err(StorageError::from)?;
            initialize_schema(&conn)?;
        }

        tracing::debug!(
            "Opened {} (max {} open, {} idle connections)",
            path.display(),
            max_open,
            max_idle
        );

        Ok(Self { pool })
    }

    /// Counts the rows stored in the movies table
    pub fn count_records(&self) -> StorageResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", MOVIES_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Loads every stored record in insertion order
    pub fn load_records(&self) -> StorageResult<Vec<MovieRecord>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT Title, Director, Picture, Actor, Year, Score, Quote FROM {} ORDER BY id",
            MOVIES_TABLE
        ))?;

        let records = stmt
            .query_map([], |row| {
                Ok(MovieRecord {
                    title: row.get(0)?,
                    director: row.get(1)?,
                    picture: row.get(2)?,
                    actor: row.get(3)?,
                    year: row.get(4)?,
                    score: row.get(5)?,
                    quote: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Current connection pool occupancy
    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus::of(&self.pool)
    }
}

impl RecordSink for SqliteStorage {
    fn insert(&self, record: &MovieRecord) -> StorageResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(INSERT_SQL, params_from_iter(record.columns()))?;
        Ok(conn.last_insert_rowid())
    }
}
