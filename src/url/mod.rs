//! URL handling module for Shelfwatch
//!
//! Product URLs arrive from hand-edited spreadsheets, so they are trimmed and
//! given a scheme before being handed to the proxy.

mod normalize;

// Re-export main functions
pub use normalize::normalize_product_url;
