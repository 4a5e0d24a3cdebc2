use crate::report::{Reporter, ScrapeEvent};

/// Renders run events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::BatchStarted {
                total,
                max_attempts,
            } => {
                tracing::info!(
                    "Processing {} products sequentially (max {} attempts each)",
                    total,
                    max_attempts
                );
            }
            ScrapeEvent::RowStarted { row, total, url } => {
                tracing::info!("[{}/{}] Processing: {}", row + 1, total, url);
            }
            ScrapeEvent::AttemptStarted { context } => {
                tracing::info!(
                    attempt = context.attempt,
                    max_attempts = context.max_attempts,
                    "Attempting to scrape: {}",
                    context.url
                );
            }
            ScrapeEvent::AttemptFailed { context, reason } => {
                let elapsed_ms = context.elapsed().as_millis() as u64;
                let will_retry = !context.is_last();
                if reason.is_fetch_failure() {
                    tracing::error!(
                        attempt = context.attempt,
                        elapsed_ms,
                        will_retry,
                        "Attempt failed for {}: {}",
                        context.url,
                        reason
                    );
                } else {
                    tracing::warn!(
                        attempt = context.attempt,
                        elapsed_ms,
                        will_retry,
                        "{} for {}",
                        reason,
                        context.url
                    );
                }
            }
            ScrapeEvent::AttemptSucceeded { context } => {
                tracing::info!(
                    attempt = context.attempt,
                    elapsed_ms = context.elapsed().as_millis() as u64,
                    "Successfully scraped: {}",
                    context.url
                );
            }
            ScrapeEvent::ExtractionWarning { url, message } => {
                tracing::warn!("Error extracting data from {}: {}", url, message);
            }
            ScrapeEvent::RowFinished { row, total, record } => {
                let percent = (row + 1) as f64 / total.max(1) as f64 * 100.0;
                if record.status.is_success() {
                    tracing::info!(
                        "Success! Price: {}, Stock: {}",
                        record.price_cell(),
                        record.availability
                    );
                } else {
                    tracing::error!("Row {} failed: {}", row + 1, record.status);
                }
                tracing::info!("Progress: {}/{} ({:.1}%)", row + 1, total, percent);
            }
            ScrapeEvent::PersistFailed { row, error } => {
                tracing::error!("Error updating output row {}: {}", row + 1, error);
            }
            ScrapeEvent::Pausing { delay } => {
                tracing::debug!("Waiting {}ms before next product", delay.as_millis());
            }
            ScrapeEvent::BatchFinished { summary } => {
                tracing::info!(
                    total = summary.total,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    out_of_stock = summary.out_of_stock,
                    "Scraping completed"
                );
            }
        }
    }
}
