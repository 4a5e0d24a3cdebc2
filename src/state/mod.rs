//! State module for per-row processing
//!
//! This module provides the values that flow through a run.
//!
//! # Components
//!
//! - `Availability`: Stock state extracted from a page
//! - `ProductRecord` / `RecordStatus`: The single result persisted per input row
//! - `AttemptContext` / `RetryReason`: Ephemeral state inside the retry loop

mod attempt;
mod availability;
mod record;

// Re-export main types
pub use attempt::{AttemptContext, RetryReason};
pub use availability::Availability;
pub use record::{ProductRecord, RecordStatus, NOT_AVAILABLE, TIMESTAMP_FORMAT};
