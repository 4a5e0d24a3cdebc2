//! Output module for exporting the sheet and reporting on runs
//!
//! This module handles:
//! - Per-run counters collected while a batch runs
//! - CSV export of the output sheet
//! - Markdown run reports
//! - Statistics read back from the database

mod csv_export;
mod markdown;
pub mod stats;

pub use csv_export::{export_csv, write_csv};
pub use markdown::{format_run_report, generate_run_report};
pub use stats::{load_statistics, print_statistics, RunSummary, SheetStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
