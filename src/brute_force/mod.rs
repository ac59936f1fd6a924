//! Exact k-nearest-neighbor scan over binary codes.
//!
//! This module computes exact top-k results by exhaustively comparing every
//! query with every (non-excluded) database code.

mod dispatch;
mod scan;
mod top_k;

pub use scan::{binary_knn, binary_knn_hc, ScanSummary};
pub use top_k::{HeapState, KnnHeapArray, MaxHeapMut};
