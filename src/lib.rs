//! Shelfwatch: a product page fact extractor
//!
//! This crate reads a list of Amazon product URLs from a spreadsheet, fetches
//! each page through a scraping proxy, extracts availability, price, reviews,
//! rating and category rank, and writes the results back row by row.

pub mod config;
pub mod input;
pub mod output;
pub mod report;
pub mod scrape;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Shelfwatch operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Input spreadsheet validation errors
///
/// Every variant is fatal: the run stops before any output row is written.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file '{0}' not found")]
    NotFound(String),

    #[error("Error reading input file: {0}")]
    Unreadable(#[from] csv::Error),

    #[error("Input file is empty")]
    Empty,

    #[error("No URL column found; the input needs a column containing 'URL' in its name")]
    NoUrlColumn,
}

/// Result type alias for Shelfwatch operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use output::RunSummary;
pub use scrape::{extract_product, BatchDriver, RetryController};
pub use state::{Availability, ProductRecord, RecordStatus};
