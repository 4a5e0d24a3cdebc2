//! Markdown run report
//!
//! Summarizes the latest run and lists the rows a reader has to act on:
//! highlighted (out-of-stock) products and rows that did not succeed.

use crate::output::{OutputError, OutputResult};
use crate::storage::{Highlight, OutputRow, RunRecord, Storage};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the report for the latest run to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - No run recorded, or the file could not be written
pub fn generate_run_report(storage: &dyn Storage, output_path: &Path) -> OutputResult<()> {
    let run = storage
        .get_latest_run()?
        .ok_or_else(|| OutputError::Write("no runs recorded in database".to_string()))?;
    let rows = storage.load_rows()?;

    let markdown = format_run_report(&run, &rows);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run and its sheet as markdown
pub fn format_run_report(run: &RunRecord, rows: &[OutputRow]) -> String {
    let mut md = String::new();

    md.push_str("# Shelfwatch Run Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", run.id));
    md.push_str(&format!("- **Started**: {}\n", run.started_at));
    if let Some(finished) = &run.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
    md.push_str(&format!("- **Input**: {}\n", run.input_path));
    md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
    if let Some(error) = &run.error_message {
        md.push_str(&format!("- **Error**: {}\n", error));
    }
    md.push('\n');

    let success_rate = if run.total > 0 {
        run.succeeded as f64 / run.total as f64 * 100.0
    } else {
        0.0
    };
    md.push_str("## Totals\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Rows | {} |\n", run.total));
    md.push_str(&format!("| Succeeded | {} |\n", run.succeeded));
    md.push_str(&format!("| Failed | {} |\n", run.failed));
    md.push_str(&format!("| Success Rate | {:.1}% |\n\n", success_rate));

    let highlighted: Vec<&OutputRow> = rows
        .iter()
        .filter(|row| row.highlight == Some(Highlight::OutOfStock))
        .collect();
    if !highlighted.is_empty() {
        md.push_str("## Out of Stock\n\n");
        md.push_str("| Row | URL | Last Updated |\n");
        md.push_str("|-----|-----|--------------|\n");
        for row in highlighted {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                row.row_index + 1,
                escape_cell(&row.url),
                escape_cell(&row.last_updated)
            ));
        }
        md.push('\n');
    }

    let failed: Vec<&OutputRow> = rows
        .iter()
        .filter(|row| row.status != "Success" && !row.is_pending())
        .collect();
    if !failed.is_empty() {
        md.push_str("## Failed Rows\n\n");
        md.push_str("| Row | URL | Status |\n");
        md.push_str("|-----|-----|--------|\n");
        for row in failed {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                row.row_index + 1,
                escape_cell(&row.url),
                escape_cell(&row.status)
            ));
        }
        md.push('\n');
    }

    let pending = rows.iter().filter(|row| row.is_pending()).count();
    if pending > 0 {
        md.push_str(&format!("{} row(s) were never processed.\n", pending));
    }

    md
}

/// Makes free text safe inside a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
