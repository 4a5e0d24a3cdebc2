//! Product record and its per-row outcome

use crate::state::Availability;
use chrono::{DateTime, Local};
use std::fmt;

/// Timestamp format used in the `Last_Updated` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sentinel written for price and rank cells that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Prefix of the status cell for rows whose markup could not be fully parsed
const EXTRACTION_ERROR_PREFIX: &str = "Extraction Error: ";

/// Outcome of processing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// Page fetched and extracted
    Success,

    /// Page fetched but at least one field token could not be converted
    ExtractionError(String),

    /// Every attempt failed; the record carries no product data
    TerminalFailure(String),
}

impl RecordStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Renders the status as written to the output sheet
    pub fn to_cell(&self) -> String {
        match self {
            Self::Success => "Success".to_string(),
            Self::ExtractionError(message) => format!("{}{}", EXTRACTION_ERROR_PREFIX, message),
            Self::TerminalFailure(message) => message.clone(),
        }
    }

    /// Parses a status cell back into a status
    ///
    /// Anything that is neither `Success` nor an extraction error is a
    /// terminal failure message.
    pub fn from_cell(s: &str) -> Self {
        if s == "Success" {
            Self::Success
        } else if let Some(message) = s.strip_prefix(EXTRACTION_ERROR_PREFIX) {
            Self::ExtractionError(message.to_string())
        } else {
            Self::TerminalFailure(s.to_string())
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell())
    }
}

/// Facts extracted for a single product URL
///
/// A record is built fresh for every fetch attempt and never mutated after
/// it is handed back to the batch driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// The URL as it appeared in the input sheet
    pub url: String,

    pub availability: Availability,

    /// Whole-currency-unit price with separators removed
    pub price: Option<String>,

    pub review_count: u64,

    /// Average rating out of 5
    pub rating: f64,

    /// Rank in the Electronics category
    pub category_rank: Option<u64>,

    pub last_updated: DateTime<Local>,

    pub status: RecordStatus,
}

impl ProductRecord {
    /// Creates a record with every field at its default value
    pub fn new(url: &str, availability: Availability, status: RecordStatus) -> Self {
        Self {
            url: url.to_string(),
            availability,
            price: None,
            review_count: 0,
            rating: 0.0,
            category_rank: None,
            last_updated: Local::now(),
            status,
        }
    }

    /// Creates the designated error record for a row whose attempts all failed
    pub fn terminal_failure(url: &str, message: impl Into<String>) -> Self {
        Self::new(
            url,
            Availability::Error,
            RecordStatus::TerminalFailure(message.into()),
        )
    }

    /// Returns a copy carrying a different URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Returns true if the page looked in stock but no price was parsed
    pub fn is_unpriced_in_stock(&self) -> bool {
        self.availability == Availability::InStock && self.price.is_none()
    }

    pub fn price_cell(&self) -> String {
        self.price
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn review_count_cell(&self) -> String {
        self.review_count.to_string()
    }

    pub fn rating_cell(&self) -> String {
        format!("{:.1}", self.rating)
    }

    pub fn category_rank_cell(&self) -> String {
        self.category_rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn last_updated_cell(&self) -> String {
        self.last_updated.format(TIMESTAMP_FORMAT).to_string()
    }
}
