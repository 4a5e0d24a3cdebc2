//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::output::RunSummary;
use crate::state::{Availability, ProductRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Highlight, ResultSheet, Storage, StorageError, StorageResult};
use crate::storage::{OutputRow, RunRecord, RunStatus};
use crate::ShelfError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, input_path, \
                           total, succeeded, failed, error_message";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ShelfError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ShelfError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, ShelfError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        input_path: row.get(5)?,
        total: row.get::<_, i64>(6)? as u64,
        succeeded: row.get::<_, i64>(7)? as u64,
        failed: row.get::<_, i64>(8)? as u64,
        error_message: row.get(9)?,
    })
}

impl ResultSheet for SqliteStorage {
    fn create_sheet(&mut self, urls: &[String]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM output_rows", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO output_rows
                    (row_index, url, availability, price, no_of_reviews, rating,
                     electronics_rank, last_updated, status, highlight)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL)",
            )?;
            for (index, url) in urls.iter().enumerate() {
                let row = OutputRow::pending(index, url);
                stmt.execute(params![
                    index as i64,
                    row.url,
                    row.availability,
                    row.price,
                    row.no_of_reviews,
                    row.rating,
                    row.electronics_rank,
                    row.last_updated,
                    row.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_row(&mut self, row: usize, record: &ProductRecord) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE output_rows
             SET url = ?1, availability = ?2, price = ?3, no_of_reviews = ?4, rating = ?5,
                 electronics_rank = ?6, last_updated = ?7, status = ?8, highlight = NULL
             WHERE row_index = ?9",
            params![
                record.url,
                record.availability.to_cell(),
                record.price_cell(),
                record.review_count_cell(),
                record.rating_cell(),
                record.category_rank_cell(),
                record.last_updated_cell(),
                record.status.to_cell(),
                row as i64,
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RowNotFound(row));
        }
        Ok(())
    }

    fn highlight_row(&mut self, row: usize, highlight: Highlight) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE output_rows SET highlight = ?1 WHERE row_index = ?2",
            params![highlight.fill(), row as i64],
        )?;

        if changed == 0 {
            return Err(StorageError::RowNotFound(row));
        }
        Ok(())
    }

    fn load_rows(&self) -> StorageResult<Vec<OutputRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT row_index, url, availability, price, no_of_reviews, rating,
                    electronics_rank, last_updated, status, highlight
             FROM output_rows ORDER BY row_index",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let highlight: Option<String> = row.get(9)?;
                Ok(OutputRow {
                    row_index: row.get::<_, i64>(0)? as usize,
                    url: row.get(1)?,
                    availability: row.get(2)?,
                    price: row.get(3)?,
                    no_of_reviews: row.get(4)?,
                    rating: row.get(5)?,
                    electronics_rank: row.get(6)?,
                    last_updated: row.get(7)?,
                    status: row.get(8)?,
                    highlight: highlight.as_deref().and_then(Highlight::from_fill),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, input_path: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status, input_path)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                now,
                config_hash,
                RunStatus::Running.to_db_string(),
                input_path
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let query = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        let run = self.conn.query_row(&query, [], run_from_row).optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, summary: &RunSummary) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs
             SET status = ?1, finished_at = ?2, total = ?3, succeeded = ?4, failed = ?5
             WHERE id = ?6",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                summary.total as i64,
                summary.succeeded as i64,
                summary.failed as i64,
                run_id
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, error_message = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, error, run_id],
        )?;

        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Statistics =====

    fn count_rows(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM output_rows", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_rows_by_availability(&self) -> StorageResult<HashMap<Availability, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT availability, COUNT(*) FROM output_rows GROUP BY availability")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (cell, count) = row?;
            if let Some(availability) = Availability::from_cell(&cell) {
                counts.insert(availability, count as u64);
            }
        }

        Ok(counts)
    }

    fn count_rows_by_status(&self) -> StorageResult<HashMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM output_rows GROUP BY status")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            counts.insert(status, count as u64);
        }

        Ok(counts)
    }
}
