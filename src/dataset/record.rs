//! Row types for the embedding dataset

use serde::{Deserialize, Serialize};

/// URL prefix under which dog images are served
pub const IMAGE_URL_PREFIX: &str = "/static/dogs/";

/// One row of the backing CSV.
///
/// Columns not named here are ignored when deserializing by header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetRow {
    pub filepaths: String,
    pub x: f64,
    pub y: f64,
    pub labels: String,
}

/// A record as returned by `/get_dog_data`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRecord {
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    pub class_name: String,
    pub labels: String,
}

impl From<DatasetRow> for DataRecord {
    fn from(row: DatasetRow) -> Self {
        Self {
            image_url: image_url(&row.filepaths),
            x: row.x,
            y: row.y,
            class_name: row.labels.clone(),
            labels: row.labels,
        }
    }
}

/// Map a stored relative path to its servable URL (plain concatenation)
pub fn image_url(filepath: &str) -> String {
    format!("{IMAGE_URL_PREFIX}{filepath}")
}
