//! Storage module for persisting scraped records
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite schema initialization for the `douban_movies` table
//! - An r2d2 connection pool shared by concurrent workers
//! - The [`RecordSink`] boundary the workers write through

mod pool;
mod schema;
mod sqlite;
mod traits;

pub use pool::{build_pool, PoolStatus, SqlitePool};
pub use schema::MOVIES_TABLE;
pub use sqlite::SqliteStorage;
pub use traits::{store_record, RecordSink, StorageError, StorageResult};

#[cfg(test)]
pub(crate) use traits::rejected_write;

use crate::config::StorageConfig;
use crate::HarvestError;

/// Opens the storage described by the config
///
/// # Arguments
///
/// * `config` - Storage section of the configuration
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(HarvestError)` - Failed to initialize storage
pub fn open_storage(config: &StorageConfig) -> Result<SqliteStorage, HarvestError> {
    SqliteStorage::from_config(config)
}
