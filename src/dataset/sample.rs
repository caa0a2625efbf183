//! Seeded row sampling
//!
//! Indices are drawn with `rand::seq::index::sample` from a `StdRng` seeded
//! with a fixed value, then sorted so the sample keeps file order. The same
//! input and seed always yield the same rows.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Upper bound on rows returned per request
pub const SAMPLE_SIZE: usize = 500;

/// Seed for the sampling generator
pub const SAMPLE_SEED: u64 = 42;

/// Pick `min(amount, len)` distinct indices in ascending order
pub fn sample_indices(len: usize, amount: usize, seed: u64) -> Vec<usize> {
    let amount = amount.min(len);
    if amount == len {
        return (0..len).collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, len, amount).into_vec();
    picked.sort_unstable();
    picked
}

/// Keep only the sampled rows
pub fn sample_rows<T>(rows: Vec<T>, amount: usize, seed: u64) -> Vec<T> {
    let mut keep = sample_indices(rows.len(), amount, seed).into_iter().peekable();

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(row)
            } else {
                None
            }
        })
        .collect()
}
