//! Input spreadsheet module
//!
//! Reads the sheet of product URLs and locates the URL-bearing column.
//! Any failure here is fatal: the run stops before an output row exists.

mod reader;

pub use reader::{find_url_column, load_input, InputSheet};
