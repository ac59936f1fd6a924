//! Configuration types for bitknn.

use crate::error::{BitKnnError, Result};
use crate::types::DatapointIndex;
use serde::{Deserialize, Serialize};

/// Default number of database codes scanned per block.
pub const DEFAULT_BLOCK_SIZE: usize = 65536;

/// Default minimum number of queries before the scan goes parallel.
pub const DEFAULT_PARALLEL_QUERY_THRESHOLD: usize = 1;

/// Configuration for one scan call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of database codes resident per block.
    pub block_size: usize,

    /// Sort every query's results ascending by distance once the scan ends.
    pub order_results: bool,

    /// Reset the heaps to the empty state before scanning.
    pub init_heaps: bool,

    /// Global id of the first database code in the batch.
    pub id_offset: DatapointIndex,

    /// Process queries on the rayon pool.
    pub parallel: bool,

    /// Minimum number of queries for the parallel path.
    pub parallel_query_threshold: usize,

    /// Reject metrics the kernel cannot compute instead of skipping the scan.
    pub strict_metric: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            order_results: true,
            init_heaps: true,
            id_offset: 0,
            parallel: true,
            parallel_query_threshold: DEFAULT_PARALLEL_QUERY_THRESHOLD,
            strict_metric: false,
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set whether results are sorted at the end of the scan.
    pub fn with_order_results(mut self, order: bool) -> Self {
        self.order_results = order;
        self
    }

    /// Set whether heaps are reset before the scan.
    pub fn with_init_heaps(mut self, init: bool) -> Self {
        self.init_heaps = init;
        self
    }

    /// Set the global id of the first database code.
    pub fn with_id_offset(mut self, offset: DatapointIndex) -> Self {
        self.id_offset = offset;
        self
    }

    /// Enable or disable parallel query processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the minimum number of queries for the parallel path.
    pub fn with_parallel_query_threshold(mut self, threshold: usize) -> Self {
        self.parallel_query_threshold = threshold;
        self
    }

    /// Turn unsupported metrics into errors.
    pub fn with_strict_metric(mut self, strict: bool) -> Self {
        self.strict_metric = strict;
        self
    }

    /// Check whether a batch of `num_queries` should run in parallel.
    pub fn use_parallel(&self, num_queries: usize) -> bool {
        self.parallel && num_queries >= self.parallel_query_threshold.max(1)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(BitKnnError::invalid_argument("block size must be > 0"));
        }
        if self.id_offset < 0 {
            return Err(BitKnnError::invalid_argument(format!(
                "id offset must be >= 0, got {}",
                self.id_offset
            )));
        }
        Ok(())
    }
}
