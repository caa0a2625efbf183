//! Backing file loading
//!
//! Reads the CSV fresh on every call and validates the header before any row
//! is deserialized, so a missing column is reported by name.

use std::path::Path;
use tokio::fs;

use super::error::DatasetError;
use super::record::DatasetRow;

/// Columns the backing file must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["filepaths", "x", "y", "labels"];

/// Read and parse the backing file
pub async fn load_rows(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let data = fs::read(path)
        .await
        .map_err(|e| DatasetError::from_io(e, path))?;
    parse_rows(&data, path)
}

/// Parse CSV bytes into rows; `path` is only used for error reporting
pub fn parse_rows(data: &[u8], path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::from_csv(e, path))?;
    check_columns(headers)?;

    let mut rows = Vec::new();
    for (index, row) in reader.deserialize::<DatasetRow>().enumerate() {
        let row = row.map_err(|e| DatasetError::from_csv(e, path))?;
        // `f64` parsing accepts NaN and inf, which JSON cannot carry
        if !row.x.is_finite() || !row.y.is_finite() {
            return Err(DatasetError::Malformed {
                message: format!(
                    "record {} ({}): coordinates must be finite, got x={} y={}",
                    index + 1,
                    row.filepaths,
                    row.x,
                    row.y
                ),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

fn check_columns(headers: &csv::StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns { columns: missing })
    }
}
