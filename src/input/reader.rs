use crate::InputError;
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Product URLs read from the input sheet, in row order
#[derive(Debug, Clone)]
pub struct InputSheet {
    /// Header of the column the URLs were taken from
    pub url_column: String,

    /// One cell per data row; blank cells are kept so row positions line up
    pub urls: Vec<String>,
}

impl InputSheet {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Loads and validates the input sheet
///
/// # Validation
///
/// 1. The file must exist
/// 2. It must parse as CSV with a header row
/// 3. It must have at least one data row
/// 4. A header must contain `url` (case-insensitive); the first one wins
///
/// # Returns
///
/// * `Ok(InputSheet)` - The URL column and its cells
/// * `Err(InputError)` - The sheet cannot be used; the run must stop
pub fn load_input(path: &Path) -> Result<InputSheet, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

    if rows.is_empty() {
        return Err(InputError::Empty);
    }

    let column = find_url_column(&headers).ok_or(InputError::NoUrlColumn)?;

    let urls = rows
        .iter()
        .map(|row| row.get(column).unwrap_or("").to_string())
        .collect();

    Ok(InputSheet {
        url_column: headers.get(column).unwrap_or("").to_string(),
        urls,
    })
}

/// Returns the index of the first header containing `url`, ignoring case
pub fn find_url_column(headers: &StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.to_lowercase().contains("url"))
}
