//! SQLite connection pool
//!
//! An r2d2 pool over rusqlite connections. At most `max_open` connections are
//! open at once; `max_idle` of them are kept warm, and idle connections above
//! that are reaped once they sit idle for a minute. Checkout blocks, so it must only
//! happen in blocking contexts (`tokio::task::spawn_blocking` in the workers).

use crate::storage::traits::StorageResult;
use r2d2::{Builder, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits on SQLite's file lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a checkout waits for a free connection
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections above the warm set are closed after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

pub type SqlitePool = Pool<SqliteConnectionManager>;

/// Snapshot of pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open (checked out + idle)
    pub open: usize,
    /// Connections sitting idle in the pool
    pub idle: usize,
}

impl PoolStatus {
    pub fn of(pool: &SqlitePool) -> Self {
        let state = pool.state();
        Self {
            open: state.connections as usize,
            idle: state.idle_connections as usize,
        }
    }
}

/// Builds the pool for the database at `path`
///
/// `max_open` is clamped to at least 1 and `max_idle` to at most `max_open`.
/// The warm set is opened before this returns, so an unreachable database
/// fails here rather than on the first insert.
pub fn build_pool(path: &Path, max_open: u32, max_idle: u32) -> StorageResult<SqlitePool> {
    let pool = pool_builder(max_open, max_idle)
        .connection_timeout(CHECKOUT_TIMEOUT)
        .build(connection_manager(path))?;
    Ok(pool)
}

fn pool_builder(max_open: u32, max_idle: u32) -> Builder<SqliteConnectionManager> {
    let max_open = max_open.max(1);
    Pool::builder()
        .max_size(max_open)
        .min_idle(Some(max_idle.min(max_open)))
        .idle_timeout(Some(IDLE_TIMEOUT))
}

fn connection_manager(path: &Path) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path).with_init(configure_connection)
}

/// Applied to every connection the pool opens
fn configure_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
    ",
    )
}
