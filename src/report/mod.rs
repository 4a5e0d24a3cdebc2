//! Run reporting
//!
//! The scrape pipeline never logs directly. It emits [`ScrapeEvent`]s to a
//! [`Reporter`], and the binary plugs in [`TracingReporter`] to render them.
//! Tests plug in a recorder instead of capturing console output.

mod events;
mod tracing_reporter;

pub use events::ScrapeEvent;
pub use tracing_reporter::TracingReporter;

/// Observer for structured run events
pub trait Reporter {
    /// Receives one event; must not fail
    fn report(&self, event: ScrapeEvent);
}

/// Reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: ScrapeEvent) {}
}
