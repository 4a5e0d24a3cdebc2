//! Database schema definitions

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track scrape runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    input_path TEXT NOT NULL,
    total INTEGER NOT NULL DEFAULT 0,
    succeeded INTEGER NOT NULL DEFAULT 0,
    failed INTEGER NOT NULL DEFAULT 0,
    error_message TEXT
);

-- The output sheet, one row per input URL
CREATE TABLE IF NOT EXISTS output_rows (
    row_index INTEGER PRIMARY KEY,
    url TEXT NOT NULL,
    availability TEXT NOT NULL,
    price TEXT NOT NULL,
    no_of_reviews TEXT NOT NULL,
    rating TEXT NOT NULL,
    electronics_rank TEXT NOT NULL,
    last_updated TEXT NOT NULL,
    status TEXT NOT NULL,
    highlight TEXT
);

CREATE INDEX IF NOT EXISTS idx_output_rows_availability ON output_rows(availability);
CREATE INDEX IF NOT EXISTS idx_output_rows_status ON output_rows(status);
"#;

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
