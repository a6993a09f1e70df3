//! Storage traits and error types
//!
//! This module defines the record sink interface used by the fetch workers
//! and the error type shared by storage backends.

use crate::record::MovieRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence boundary for scraped records
///
/// Implementations must be shareable across workers; each call stores one
/// record and returns the generated row id.
pub trait RecordSink: Send + Sync {
    /// Persists a single record
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - Row id of the inserted record
    /// * `Err(StorageError)` - The write was rejected
    fn insert(&self, record: &MovieRecord) -> StorageResult<i64>;
}

/// A write rejected the way SQLite reports a constraint failure
#[cfg(test)]
pub(crate) fn rejected_write(message: impl Into<String>) -> StorageError {
    StorageError::Sqlite(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
        Some(message.into()),
    ))
}

/// Stores one record, logging the outcome
///
/// Failures are reported as `false` and never propagated, so a caller
/// looping over a page's records keeps going after a rejected write.
pub fn store_record<S: RecordSink + ?Sized>(sink: &S, record: &MovieRecord) -> bool {
    match sink.insert(record) {
        Ok(id) => {
            tracing::info!("Saved '{}' (row id {})", record.title, id);
            true
        }
        Err(e) => {
            tracing::warn!("Save failed for '{}': {}", record.title, e);
            false
        }
    }
}
