//! # bitknn - k-nearest neighbors over binary codes
//!
//! Exact top-k search over fixed-width, bit-packed codes under the
//! set-overlap metrics used for chemical fingerprints and similar data.
//!
//! ## Overview
//!
//! - **Distance computers**: one kernel per (metric, code width); widths of
//!   16, 32, 64 and 128 bytes are unrolled over 64-bit words, any other
//!   width walks the bytes
//! - **Block-parallel scan**: the database is scanned in blocks, queries run
//!   in parallel on the rayon pool, each into its own bounded max-heap
//! - **Exclusion masks**: skip soft-deleted ids without touching their codes
//!
//! ## Quick Start
//!
//! ```rust
//! use bitknn::prelude::*;
//!
//! let database = BinaryDataset::from_vecs(vec![
//!     vec![0xFF; 16],
//!     vec![0x0F; 16],
//!     vec![0x00; 16],
//! ])
//! .unwrap();
//! let queries = BinaryDataset::from_vecs(vec![vec![0xFF; 16]]).unwrap();
//!
//! let heaps = binary_knn(
//!     MetricType::Substructure,
//!     queries.as_codes(),
//!     database.as_codes(),
//!     2,
//!     &ScanConfig::default(),
//!     None,
//! )
//! .unwrap();
//!
//! for (distance, id) in heaps.results(0) {
//!     println!("id {} at {:.4}", id, distance);
//! }
//! ```
//!
//! ## Distance Measures
//!
//! - `Jaccard` / `Tanimoto`: `1 - |A ∩ B| / |A ∪ B|`, `0.0` when both are empty
//! - `Substructure`: `1 - |A ∩ B| / |B|`, `1.0` when nothing overlaps
//! - `Superstructure`: `1 - |A ∩ B| / |A|`, `1.0` when nothing overlaps
//!
//! `A` is the query, `B` the database code. Other `MetricType` values are
//! not computed by this kernel; see [`brute_force::binary_knn_hc`].
//!
//! ## Module Overview
//!
//! - [`brute_force`]: scan driver and top-k heaps
//! - [`distance_measures`]: metrics and distance computers
//! - [`data_format`]: code batches
//! - [`restricts`]: exclusion masks
//! - [`utils`]: bit helpers

#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::module_inception)]

pub mod brute_force;
pub mod data_format;
pub mod distance_measures;
pub mod restricts;
pub mod utils;

mod config;
mod error;
mod types;

pub use config::{ScanConfig, DEFAULT_BLOCK_SIZE, DEFAULT_PARALLEL_QUERY_THRESHOLD};
pub use error::{BitKnnError, ErrorCode, Result};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::brute_force::{binary_knn, binary_knn_hc, HeapState, KnnHeapArray, ScanSummary};
    pub use crate::config::{ScanConfig, DEFAULT_BLOCK_SIZE};
    pub use crate::data_format::{BinaryCodes, BinaryDataset};
    pub use crate::distance_measures::{binary_distance, BinaryComputer, CodeWidth, MetricType};
    pub use crate::error::{BitKnnError, ErrorCode, Result};
    pub use crate::restricts::{ConcurrentBitset, ExclusionList, ExclusionMask, PredicateMask};
    pub use crate::types::*;
}
