//! Synthetic data for demos and tests.

pub mod sample;

pub use sample::{DEFAULT_ROWS, DEFAULT_SEED, SampleRow, generate_sample, write_sample_csv};
