//! Storage traits and error types
//!
//! The output sheet and the run ledger are kept behind traits so the batch
//! driver can be exercised against an in-memory database or a test double.

use crate::output::RunSummary;
use crate::state::{Availability, ProductRecord};
use crate::storage::{OutputRow, RunRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Output row not found: {0}")]
    RowNotFound(usize),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Row highlight applied to the output sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Light red fill marking an out-of-stock product
    OutOfStock,
}

impl Highlight {
    /// Fill colour as an RGB hex string
    pub fn fill(&self) -> &'static str {
        match self {
            Self::OutOfStock => "FFCCCC",
        }
    }

    pub fn from_fill(s: &str) -> Option<Self> {
        match s {
            "FFCCCC" => Some(Self::OutOfStock),
            _ => None,
        }
    }
}

/// The output sheet: one row per input URL, in input order
///
/// Every mutating call is committed before it returns, so rows already
/// written survive a crash later in the batch.
pub trait ResultSheet {
    /// Replaces the sheet with one `Pending` placeholder row per URL
    ///
    /// # Arguments
    ///
    /// * `urls` - Raw URL cells from the input sheet, in order
    fn create_sheet(&mut self, urls: &[String]) -> StorageResult<()>;

    /// Overwrites the row at `row` (0-based) with the record's cells
    ///
    /// Clears any previous highlight on that row.
    fn write_row(&mut self, row: usize, record: &ProductRecord) -> StorageResult<()>;

    /// Applies a highlight to the row at `row` (0-based)
    fn highlight_row(&mut self, row: usize, highlight: Highlight) -> StorageResult<()>;

    /// Loads every row of the sheet in order
    fn load_rows(&self) -> StorageResult<Vec<OutputRow>>;
}

/// Full storage backend: the output sheet plus run bookkeeping
pub trait Storage: ResultSheet {
    // ===== Run Management =====

    /// Records the start of a run
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, input_path: &str) -> StorageResult<i64>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed and stores its counters
    fn complete_run(&mut self, run_id: i64, summary: &RunSummary) -> StorageResult<()>;

    /// Marks a run as failed with the fatal error message
    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()>;

    // ===== Statistics =====

    fn count_rows(&self) -> StorageResult<u64>;

    /// Counts rows per availability; placeholder rows count as `Unknown`
    fn count_rows_by_availability(&self) -> StorageResult<HashMap<Availability, u64>>;

    /// Counts rows per status cell
    fn count_rows_by_status(&self) -> StorageResult<HashMap<String, u64>>;
}
