//! Storage module for persisting the output sheet
//!
//! This module handles all database operations for a scrape, including:
//! - SQLite database initialization and schema management
//! - The output sheet (one committed row per input URL)
//! - Run tracking with per-run counters

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Highlight, ResultSheet, Storage, StorageError, StorageResult};

use crate::state::Availability;
use crate::ShelfError;
use std::path::Path;

/// Column headers of the output sheet, in order
pub const OUTPUT_COLUMNS: [&str; 8] = [
    "URL",
    "Availability",
    "Price",
    "No_of_Reviews",
    "Rating",
    "Electronics_Rank",
    "Last_Updated",
    "Status",
];

/// Cell value of every column of a row that has not been processed yet
pub const PENDING: &str = "Pending";

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ShelfError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ShelfError> {
    SqliteStorage::new(path)
}

/// One row of the output sheet as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// 0-based position in the input sheet
    pub row_index: usize,
    pub url: String,
    pub availability: String,
    pub price: String,
    pub no_of_reviews: String,
    pub rating: String,
    pub electronics_rank: String,
    pub last_updated: String,
    pub status: String,
    pub highlight: Option<Highlight>,
}

impl OutputRow {
    /// Builds a placeholder row
    pub fn pending(row_index: usize, url: &str) -> Self {
        Self {
            row_index,
            url: url.to_string(),
            availability: Availability::Unknown.to_cell().to_string(),
            price: PENDING.to_string(),
            no_of_reviews: PENDING.to_string(),
            rating: PENDING.to_string(),
            electronics_rank: PENDING.to_string(),
            last_updated: PENDING.to_string(),
            status: PENDING.to_string(),
            highlight: None,
        }
    }

    /// Returns the cells in `OUTPUT_COLUMNS` order
    pub fn cells(&self) -> [&str; 8] {
        [
            self.url.as_str(),
            self.availability.as_str(),
            self.price.as_str(),
            self.no_of_reviews.as_str(),
            self.rating.as_str(),
            self.electronics_rank.as_str(),
            self.last_updated.as_str(),
            self.status.as_str(),
        ]
    }

    pub fn is_pending(&self) -> bool {
        self.status == PENDING
    }
}

/// Represents a scrape run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub input_path: String,
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub error_message: Option<String>,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
