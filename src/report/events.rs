use crate::output::RunSummary;
use crate::state::{AttemptContext, ProductRecord, RetryReason};
use std::time::Duration;

/// Structured events emitted while a batch runs
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    /// The batch is about to start
    BatchStarted {
        total: usize,
        max_attempts: u32,
    },

    /// A row is about to be processed
    RowStarted {
        /// 0-based row index
        row: usize,
        total: usize,
        url: String,
    },

    /// A fetch attempt is about to be sent
    AttemptStarted { context: AttemptContext },

    /// An attempt did not yield an acceptable record
    ///
    /// Another attempt follows unless `context.is_last()`.
    AttemptFailed {
        context: AttemptContext,
        reason: RetryReason,
    },

    /// An attempt produced a record that was accepted
    AttemptSucceeded { context: AttemptContext },

    /// A field token was found but could not be converted
    ExtractionWarning { url: String, message: String },

    /// A row's final record has been persisted
    RowFinished {
        row: usize,
        total: usize,
        record: ProductRecord,
    },

    /// A row's record could not be written to the output sheet
    PersistFailed { row: usize, error: String },

    /// The driver is pausing before the next row
    Pausing { delay: Duration },

    /// Every row has been processed
    BatchFinished { summary: RunSummary },
}
