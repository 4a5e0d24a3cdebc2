//! Per-URL retry loop
//!
//! The loop is a small state machine. Each attempt's outcome is fed to
//! [`transition`], a pure function, which either schedules the next attempt
//! or settles on the final record:
//!
//! ```text
//! Attempting(n) --retry--> Attempting(n + 1)
//! Attempting(n) --accept--> Succeeded(record)
//! Attempting(max) --fail--> Exhausted(error record)
//! ```

use crate::config::RetryConfig;
use crate::report::{Reporter, ScrapeEvent};
use crate::scrape::classifier::{retry_reason, should_retry, AttemptOutcome};
use crate::scrape::extractor::extract_product;
use crate::scrape::fetcher::{FetchResult, Fetcher};
use crate::state::{AttemptContext, ProductRecord, RecordStatus, RetryReason};
use crate::url::normalize_product_url;
use std::time::Duration;

/// Status of a row whose last attempt returned an empty page
pub const EMPTY_CONTENT_MESSAGE: &str = "Empty HTML content";

/// Status of a row whose attempts all failed to fetch
pub const ATTEMPTS_EXHAUSTED_MESSAGE: &str = "All retry attempts failed";

/// Where the retry loop stands after an attempt
#[derive(Debug, Clone)]
pub enum RetryState {
    /// Another attempt is due
    Attempting(AttemptContext),

    /// The record was accepted as final
    Succeeded(ProductRecord),

    /// The attempt budget ran out; carries the designated error record
    Exhausted(ProductRecord),
}

/// Computes the next state from an attempt's outcome
pub fn transition(context: &AttemptContext, outcome: AttemptOutcome) -> RetryState {
    if should_retry(&outcome, context.attempt, context.max_attempts) {
        if let Some(reason) = retry_reason(&outcome) {
            return RetryState::Attempting(context.next(reason));
        }
    }

    match outcome {
        AttemptOutcome::Extracted(record) => RetryState::Succeeded(record),
        AttemptOutcome::EmptyContent => RetryState::Exhausted(ProductRecord::terminal_failure(
            &context.url,
            EMPTY_CONTENT_MESSAGE,
        )),
        AttemptOutcome::FetchFailed(_) => RetryState::Exhausted(ProductRecord::terminal_failure(
            &context.url,
            ATTEMPTS_EXHAUSTED_MESSAGE,
        )),
    }
}

/// Drives up to `max_attempts` fetches for one URL
pub struct RetryController<F> {
    fetcher: F,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<F: Fetcher> RetryController<F> {
    /// Creates a controller; a zero budget is raised to one attempt
    pub fn new(fetcher: F, max_attempts: u32) -> Self {
        Self {
            fetcher,
            max_attempts: max_attempts.max(1),
            retry_delay: Duration::ZERO,
        }
    }

    pub fn from_config(fetcher: F, config: &RetryConfig) -> Self {
        Self::new(fetcher, config.max_attempts)
            .with_retry_delay(Duration::from_millis(config.retry_delay_ms))
    }

    /// Sets the pause between attempts on the same URL
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Processes one URL to a final record
    ///
    /// Never fails: exhausting the budget yields an error record. Every URL
    /// gets at least one fetch, however malformed the cell is.
    pub async fn process(&self, raw_url: &str, reporter: &dyn Reporter) -> ProductRecord {
        let url = normalize_product_url(raw_url);
        let mut context = AttemptContext::first(&url, self.max_attempts);

        loop {
            reporter.report(ScrapeEvent::AttemptStarted {
                context: context.clone(),
            });

            let outcome = self.attempt(&context, reporter).await;
            let reason = retry_reason(&outcome);

            match transition(&context, outcome) {
                RetryState::Attempting(next) => {
                    if let Some(reason) = reason {
                        reporter.report(ScrapeEvent::AttemptFailed {
                            context: context.clone(),
                            reason,
                        });
                    }
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    context = next;
                }
                RetryState::Succeeded(record) => {
                    reporter.report(ScrapeEvent::AttemptSucceeded { context });
                    return record;
                }
                RetryState::Exhausted(record) => {
                    if let Some(reason) = reason {
                        reporter.report(ScrapeEvent::AttemptFailed {
                            context,
                            reason,
                        });
                    }
                    return record;
                }
            }
        }
    }

    /// Runs one fetch and turns the response into an outcome
    async fn attempt(&self, context: &AttemptContext, reporter: &dyn Reporter) -> AttemptOutcome {
        match self.fetcher.fetch(&context.url).await {
            FetchResult::Content { status_code, .. } if status_code != 200 => {
                AttemptOutcome::FetchFailed(RetryReason::HttpStatus(status_code))
            }
            FetchResult::Content { body, .. } if body.trim().is_empty() => {
                AttemptOutcome::EmptyContent
            }
            FetchResult::Content { body, .. } => {
                let record = extract_product(&body, &context.url);
                if let RecordStatus::ExtractionError(message) = &record.status {
                    reporter.report(ScrapeEvent::ExtractionWarning {
                        url: context.url.clone(),
                        message: message.clone(),
                    });
                }
                AttemptOutcome::Extracted(record)
            }
            FetchResult::HttpError { status_code } => {
                AttemptOutcome::FetchFailed(RetryReason::HttpStatus(status_code))
            }
            FetchResult::TransportError { error } => {
                AttemptOutcome::FetchFailed(RetryReason::Transport(error))
            }
        }
    }
}
