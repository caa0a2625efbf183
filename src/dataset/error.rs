//! Dataset error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons the backing file could not be turned into records.
///
/// Every variant means the data is unavailable and is answered with a 500.
/// An empty file with a valid header is not an error.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read dataset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// `message` is the CSV reader's description, which names the record and line
    #[error("malformed dataset: {message}")]
    Malformed { message: String },
}

impl DatasetError {
    pub(crate) fn from_io(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub(crate) fn from_csv(err: csv::Error, path: &Path) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::from_io(source, path),
            _ => Self::Malformed { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_io() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let mapped = DatasetError::from_io(err, Path::new("static/x.csv"));
        assert!(matches!(mapped, DatasetError::NotFound { .. }));
        assert!(mapped.to_string().contains("x.csv"));
    }

    #[test]
    fn test_other_io_kept() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped = DatasetError::from_io(err, Path::new("x.csv"));
        assert!(matches!(mapped, DatasetError::Io { .. }));
    }

    #[test]
    fn test_missing_columns_message() {
        let err = DatasetError::MissingColumns {
            columns: vec!["x".to_string(), "labels".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "dataset is missing required columns: x, labels"
        );
    }

    #[test]
    fn test_malformed_message() {
        let err = DatasetError::Malformed {
            message: "bad float".to_string(),
        };
        assert_eq!(err.to_string(), "malformed dataset: bad float");
    }
}
