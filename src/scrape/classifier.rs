//! Attempt outcome classification
//!
//! Decides whether an attempt's result is final or worth another fetch.
//! This is where "genuinely out of stock / no price shown" is told apart
//! from "the proxy handed back a broken page".
//!
//! # Rules (in order)
//!
//! | Outcome | Attempts remain | Verdict |
//! |---------|-----------------|---------|
//! | Fetch failed (non-200, transport error) | yes | retry |
//! | Fetch succeeded, empty content | yes | retry |
//! | In stock, price not parsed | yes | retry |
//! | Anything else, or no attempts left | - | accept |

use crate::state::{ProductRecord, RetryReason};

/// What a single attempt produced
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The fetch failed; no markup to look at
    FetchFailed(RetryReason),

    /// The fetch succeeded but returned no markup
    EmptyContent,

    /// Markup was fetched and run through the extractor
    Extracted(ProductRecord),
}

/// Returns the retry trigger an outcome carries, ignoring the attempt budget
pub fn retry_reason(outcome: &AttemptOutcome) -> Option<RetryReason> {
    match outcome {
        AttemptOutcome::FetchFailed(reason) => Some(reason.clone()),
        AttemptOutcome::EmptyContent => Some(RetryReason::EmptyContent),
        AttemptOutcome::Extracted(record) if record.is_unpriced_in_stock() => {
            Some(RetryReason::MissingPrice)
        }
        AttemptOutcome::Extracted(_) => None,
    }
}

/// Decides whether another attempt should be made
///
/// Pure: depends only on its arguments. Always false once
/// `attempt >= max_attempts`.
pub fn should_retry(outcome: &AttemptOutcome, attempt: u32, max_attempts: u32) -> bool {
    attempt < max_attempts && retry_reason(outcome).is_some()
}
