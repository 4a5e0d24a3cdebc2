//! Batch driver
//!
//! Walks the input URLs strictly in order. Each row is settled by the retry
//! controller, then written to the output sheet before the next row starts,
//! so a crash mid-batch leaves every finished row on disk.

use crate::output::RunSummary;
use crate::report::{Reporter, ScrapeEvent};
use crate::scrape::fetcher::Fetcher;
use crate::scrape::retry::RetryController;
use crate::state::ProductRecord;
use crate::storage::{Highlight, ResultSheet, StorageResult};
use crate::ShelfError;
use std::time::Duration;

/// Processes a whole input sheet into the output sheet
pub struct BatchDriver<'a, F, S> {
    controller: RetryController<F>,
    sheet: &'a mut S,
    reporter: &'a dyn Reporter,
    request_delay: Duration,
}

impl<'a, F: Fetcher, S: ResultSheet> BatchDriver<'a, F, S> {
    pub fn new(
        controller: RetryController<F>,
        sheet: &'a mut S,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            controller,
            sheet,
            reporter,
            request_delay: Duration::ZERO,
        }
    }

    /// Sets the pause between consecutive rows
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn controller(&self) -> &RetryController<F> {
        &self.controller
    }

    /// Runs the batch
    ///
    /// Only failing to create the output sheet is fatal. A row that cannot
    /// be persisted is reported, counted in `write_failures`, and the batch
    /// moves on.
    ///
    /// # Arguments
    ///
    /// * `urls` - Raw URL cells, in input order
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every row was processed
    /// * `Err(ShelfError)` - The output sheet could not be created
    pub async fn run_batch(&mut self, urls: &[String]) -> Result<RunSummary, ShelfError> {
        let total = urls.len();
        self.sheet.create_sheet(urls)?;

        self.reporter.report(ScrapeEvent::BatchStarted {
            total,
            max_attempts: self.controller.max_attempts(),
        });

        let mut summary = RunSummary::default();

        for (row, raw_url) in urls.iter().enumerate() {
            self.reporter.report(ScrapeEvent::RowStarted {
                row,
                total,
                url: raw_url.clone(),
            });

            let record = self
                .controller
                .process(raw_url, self.reporter)
                .await
                .with_url(raw_url);

            if let Err(e) = self.persist(row, &record) {
                summary.write_failures += 1;
                self.reporter.report(ScrapeEvent::PersistFailed {
                    row,
                    error: e.to_string(),
                });
            }

            summary.record(&record);
            self.reporter.report(ScrapeEvent::RowFinished { row, total, record });

            if row + 1 < total && !self.request_delay.is_zero() {
                self.reporter.report(ScrapeEvent::Pausing {
                    delay: self.request_delay,
                });
                tokio::time::sleep(self.request_delay).await;
            }
        }

        self.reporter.report(ScrapeEvent::BatchFinished {
            summary: summary.clone(),
        });

        Ok(summary)
    }

    fn persist(&mut self, row: usize, record: &ProductRecord) -> StorageResult<()> {
        self.sheet.write_row(row, record)?;
        if record.availability.needs_highlight() {
            self.sheet.highlight_row(row, Highlight::OutOfStock)?;
        }
        Ok(())
    }
}
