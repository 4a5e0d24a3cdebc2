//! CSV export of the output sheet

use crate::output::OutputResult;
use crate::storage::{OutputRow, OUTPUT_COLUMNS};
use std::io::Write;
use std::path::Path;

/// Writes the sheet as CSV with the standard header row
///
/// Highlighting does not survive the export; the markdown report lists the
/// highlighted rows instead.
pub fn write_csv<W: Write>(rows: &[OutputRow], writer: W) -> OutputResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.cells())?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Exports the sheet to a CSV file, replacing it if present
///
/// # Arguments
///
/// * `rows` - Sheet rows in order
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(OutputError)` - Failed to create or write the file
pub fn export_csv(rows: &[OutputRow], path: &Path) -> OutputResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, file)
}
