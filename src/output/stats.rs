//! Run counters and sheet statistics
//!
//! [`RunSummary`] is accumulated by the batch driver while rows are
//! processed; [`SheetStatistics`] is read back from the database for
//! `--stats`.

use crate::state::{Availability, ProductRecord};
use crate::storage::{RunRecord, Storage, PENDING};
use crate::ShelfError;
use std::collections::HashMap;

/// Counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows processed
    pub total: usize,

    /// Rows whose status is `Success`
    pub succeeded: usize,

    /// Rows with an extraction error or terminal failure
    pub failed: usize,

    /// Rows found out of stock (and highlighted)
    pub out_of_stock: usize,

    /// Rows whose record could not be persisted
    pub write_failures: usize,
}

impl RunSummary {
    /// Counts one finished record
    pub fn record(&mut self, record: &ProductRecord) {
        self.total += 1;
        if record.status.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        if record.availability == Availability::OutOfStock {
            self.out_of_stock += 1;
        }
    }

    /// Percentage of processed rows that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Statistics read back from the output sheet
#[derive(Debug, Clone)]
pub struct SheetStatistics {
    /// Rows in the sheet, processed or not
    pub total_rows: u64,

    /// Count of processed rows by availability
    pub rows_by_availability: HashMap<Availability, u64>,

    /// Count of rows by status cell
    pub rows_by_status: HashMap<String, u64>,

    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,
}

impl SheetStatistics {
    pub fn pending_rows(&self) -> u64 {
        self.rows_by_status.get(PENDING).copied().unwrap_or(0)
    }

    pub fn successful_rows(&self) -> u64 {
        self.rows_by_status.get("Success").copied().unwrap_or(0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(SheetStatistics)` - Successfully loaded statistics
/// * `Err(ShelfError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<SheetStatistics, ShelfError> {
    Ok(SheetStatistics {
        total_rows: storage.count_rows()?,
        rows_by_availability: storage.count_rows_by_availability()?,
        rows_by_status: storage.count_rows_by_status()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SheetStatistics) {
    println!("=== Output Sheet Statistics ===\n");

    if let Some(run) = &stats.latest_run {
        println!("Latest run:");
        println!("  ID: {}", run.id);
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!("  Status: {}", run.status.to_db_string());
        println!("  Input: {}", run.input_path);
        if let Some(error) = &run.error_message {
            println!("  Error: {}", error);
        }
        println!();
    }

    println!("Overview:");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Pending rows: {}", stats.pending_rows());
    println!();

    println!("Rows by Availability:");
    for availability in Availability::all() {
        if let Some(count) = stats.rows_by_availability.get(&availability) {
            println!("  {}: {}", availability, count);
        }
    }
    println!();

    let mut failures: Vec<_> = stats
        .rows_by_status
        .iter()
        .filter(|(status, _)| status.as_str() != "Success" && status.as_str() != PENDING)
        .collect();
    failures.sort_by(|a, b| b.1.cmp(a.1));
    if !failures.is_empty() {
        println!("Failure Summary:");
        for (status, count) in failures {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    let success_rate = if stats.total_rows > 0 {
        stats.successful_rows() as f64 / stats.total_rows as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "Success Rate: {:.1}% ({} / {} rows)",
        success_rate,
        stats.successful_rows(),
        stats.total_rows
    );
}
