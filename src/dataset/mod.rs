//! Embedding dataset module
//!
//! Turns the backing CSV into the sampled records served by `/get_dog_data`.

pub mod error;
pub mod loader;
pub mod record;
pub mod sample;

use std::path::Path;

pub use error::DatasetError;
pub use record::DataRecord;
pub use sample::{SAMPLE_SEED, SAMPLE_SIZE};

/// Result of one sampling pass
#[derive(Debug)]
pub struct Sample {
    pub records: Vec<DataRecord>,
    /// Row count of the backing file before sampling
    pub total_rows: usize,
}

/// Load the backing file and draw the bounded, seeded sample
pub async fn load_sample(path: &Path) -> Result<Sample, DatasetError> {
    let rows = loader::load_rows(path).await?;
    let total_rows = rows.len();

    let records = sample::sample_rows(rows, SAMPLE_SIZE, SAMPLE_SEED)
        .into_iter()
        .map(DataRecord::from)
        .collect();

    Ok(Sample {
        records,
        total_rows,
    })
}
