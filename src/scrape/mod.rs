//! Scrape module: from product URL to persisted record
//!
//! This module contains the core scraping logic, including:
//! - Fetching markup through the scraping proxy
//! - Field extraction from product markup
//! - Outcome classification and the per-URL retry loop
//! - The sequential batch driver

mod classifier;
mod driver;
mod extractor;
mod fetcher;
mod retry;

pub use classifier::{retry_reason, should_retry, AttemptOutcome};
pub use driver::BatchDriver;
pub use extractor::{
    extract_availability, extract_category_rank, extract_price, extract_product, extract_rating,
    extract_review_count, FieldError,
};
pub use fetcher::{build_http_client, FetchResult, Fetcher, ProxyFetcher};
pub use retry::{
    transition, RetryController, RetryState, ATTEMPTS_EXHAUSTED_MESSAGE, EMPTY_CONTENT_MESSAGE,
};

use crate::config::Config;
use crate::input::load_input;
use crate::output::{export_csv, generate_run_report, RunSummary};
use crate::report::Reporter;
use crate::storage::{open_storage, ResultSheet, SqliteStorage, Storage};
use crate::ShelfError;
use std::path::Path;
use std::time::Duration;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Load and validate the input sheet (nothing is written if this fails)
/// 2. Open the database and record the run
/// 3. Build the proxy client
/// 4. Process every row in order, persisting each one
/// 5. Close the run and write the optional CSV export and report. An export
///    failure is logged and does not fail the run.
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
/// * `reporter` - Receives progress events
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every row was processed
/// * `Err(ShelfError)` - The run could not start or the output sheet could
///   not be created
pub async fn run(
    config: &Config,
    config_hash: &str,
    reporter: &dyn Reporter,
) -> Result<RunSummary, ShelfError> {
    let sheet = load_input(Path::new(&config.input.path))?;
    tracing::info!(
        "Loaded {} rows from '{}' (URL column '{}')",
        sheet.len(),
        config.input.path,
        sheet.url_column
    );

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(config_hash, &config.input.path)?;

    match process_sheet(config, &mut storage, &sheet.urls, reporter).await {
        Ok(summary) => {
            storage.complete_run(run_id, &summary)?;
            // Rows and the run are already committed; a failed export
            // leaves them intact and can be redone with --export.
            if let Err(e) = export_outputs(config, &storage) {
                tracing::error!("Failed to write exports for run {}: {}", run_id, e);
            }
            Ok(summary)
        }
        Err(e) => {
            if let Err(mark_err) = storage.fail_run(run_id, &e.to_string()) {
                tracing::error!("Failed to mark run {} as failed: {}", run_id, mark_err);
            }
            Err(e)
        }
    }
}

async fn process_sheet(
    config: &Config,
    storage: &mut SqliteStorage,
    urls: &[String],
    reporter: &dyn Reporter,
) -> Result<RunSummary, ShelfError> {
    let client = build_http_client(&config.proxy)?;
    let fetcher = ProxyFetcher::from_config(client, &config.proxy)?;
    let controller = RetryController::from_config(fetcher, &config.retry);

    let mut driver = BatchDriver::new(controller, storage, reporter)
        .with_request_delay(Duration::from_millis(config.batch.request_delay_ms));

    driver.run_batch(urls).await
}

/// Writes the CSV export and the markdown report when configured
pub fn export_outputs(config: &Config, storage: &SqliteStorage) -> Result<(), ShelfError> {
    if let Some(csv_path) = &config.output.csv_path {
        export_csv(&storage.load_rows()?, Path::new(csv_path))?;
        tracing::info!("Output sheet exported to {}", csv_path);
    }

    if let Some(summary_path) = &config.output.summary_path {
        generate_run_report(storage, Path::new(summary_path))?;
        tracing::info!("Run report written to {}", summary_path);
    }

    Ok(())
}
