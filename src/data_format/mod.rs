//! Data format types for bitknn.
//!
//! Query and database batches are handed to the scan as contiguous runs
//! of fixed-width codes.

mod binary;

pub use binary::{BinaryCodes, BinaryDataset};
