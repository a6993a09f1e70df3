//! Database schema definitions
//!
//! The table layout is fixed; `CREATE TABLE IF NOT EXISTS` only covers a
//! fresh database file.

/// Name of the table every record is written to
pub const MOVIES_TABLE: &str = "douban_movies";

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS douban_movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    Title TEXT,
    Director TEXT,
    Picture TEXT,
    Actor TEXT,
    Year TEXT,
    Score TEXT,
    Quote TEXT
);
"#;

/// Parameterized insert for one record, columns in `MovieRecord::columns` order
pub const INSERT_SQL: &str = "INSERT INTO douban_movies (Title, Director, Picture, Actor, Year, Score, Quote) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
