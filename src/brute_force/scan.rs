//! Block-parallel top-k scan over binary codes.
//!
//! The database batch is cut into blocks of `ScanConfig::block_size` codes.
//! Blocks run one after another; within a block every query scans the whole
//! block into its own heap, in parallel across queries. Heaps are disjoint
//! windows of one buffer, so workers never share mutable state.

use super::dispatch::dispatch_scan;
use super::top_k::{HeapState, KnnHeapArray, MaxHeapMut};
use crate::config::ScanConfig;
use crate::data_format::BinaryCodes;
use crate::distance_measures::{BinaryComputer, CodeWidth, MetricType};
use crate::error::{BitKnnError, Result};
use crate::restricts::ExclusionMask;
use crate::types::DatapointIndex;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

/// What a scan call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// False when the metric was not recognized and nothing was touched.
    pub scanned: bool,
    /// Number of queries.
    pub num_queries: usize,
    /// Number of database codes.
    pub num_database: usize,
    /// Number of blocks processed.
    pub num_blocks: usize,
    /// Number of database codes skipped by the exclusion mask, as seen by
    /// the first query (0 for an empty query batch).
    pub num_excluded: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BlockScanStats {
    pub num_blocks: usize,
    pub num_excluded: usize,
}

/// Compute the top-k database codes for every query.
///
/// `heaps` must hold one heap per query. With `config.init_heaps` the heaps
/// are reset first; otherwise the scan keeps accumulating into heaps left
/// by an earlier call, which lets several database batches feed the same
/// results (use `config.id_offset` to keep their ids apart).
///
/// Database code `j` is recorded as id `config.id_offset + j` and that id is
/// what the exclusion mask is asked about.
///
/// The metric is resolved before anything else is checked. A metric outside
/// the binary family is skipped whatever the other arguments: the heaps are
/// left untouched and the summary reports `scanned == false`, unless
/// `config.strict_metric` asks for an error instead.
pub fn binary_knn_hc(
    metric: MetricType,
    heaps: &mut KnnHeapArray,
    queries: BinaryCodes<'_>,
    database: BinaryCodes<'_>,
    config: &ScanConfig,
    mask: Option<&dyn ExclusionMask>,
) -> Result<ScanSummary> {
    let nq = queries.len();
    let nb = database.len();
    let mut summary = ScanSummary {
        scanned: false,
        num_queries: nq,
        num_database: nb,
        ..Default::default()
    };

    let family = match metric.binary_family() {
        Some(family) => family,
        None if config.strict_metric => {
            return Err(BitKnnError::unimplemented(format!(
                "metric {} is not supported by the binary kernel",
                metric
            )));
        }
        None => {
            warn!(metric = %metric, "metric not supported by the binary kernel, scan skipped");
            return Ok(summary);
        }
    };

    config.validate()?;
    validate_request(heaps, &queries, &database, config)?;

    let width = CodeWidth::from_code_size(queries.code_size());
    debug!(
        metric = %metric,
        nq,
        nb,
        code_size = queries.code_size(),
        specialized = width.is_specialized(),
        k = heaps.k(),
        block_size = config.block_size,
        "binary knn scan"
    );

    if config.init_heaps {
        heaps.heapify();
    }

    let stats = dispatch_scan(family, width, heaps, queries, database, config, mask);
    heaps.mark_accumulating();

    if config.order_results {
        heaps.reorder();
    }

    summary.scanned = true;
    summary.num_blocks = stats.num_blocks;
    summary.num_excluded = stats.num_excluded;
    Ok(summary)
}

/// Allocate heaps for `queries`, scan `database` and return them.
pub fn binary_knn(
    metric: MetricType,
    queries: BinaryCodes<'_>,
    database: BinaryCodes<'_>,
    k: usize,
    config: &ScanConfig,
    mask: Option<&dyn ExclusionMask>,
) -> Result<KnnHeapArray> {
    let mut heaps = KnnHeapArray::new(queries.len(), k)?;
    let config = config.clone().with_init_heaps(true);
    binary_knn_hc(metric, &mut heaps, queries, database, &config, mask)?;
    Ok(heaps)
}

fn validate_request(
    heaps: &KnnHeapArray,
    queries: &BinaryCodes<'_>,
    database: &BinaryCodes<'_>,
    config: &ScanConfig,
) -> Result<()> {
    if queries.code_size() != database.code_size() {
        return Err(BitKnnError::invalid_argument(format!(
            "query codes are {} bytes but database codes are {} bytes",
            queries.code_size(),
            database.code_size()
        )));
    }
    if queries.len() != heaps.num_heaps() {
        return Err(BitKnnError::invalid_argument(format!(
            "{} queries for {} result heaps",
            queries.len(),
            heaps.num_heaps()
        )));
    }
    if !config.init_heaps {
        match heaps.state() {
            HeapState::Uninitialized => {
                return Err(BitKnnError::failed_precondition(
                    "heaps were never initialized; enable init_heaps or call heapify()",
                ));
            }
            HeapState::Finalized => {
                return Err(BitKnnError::failed_precondition(
                    "heaps were already reordered and can no longer accept candidates",
                ));
            }
            HeapState::Heapified | HeapState::Accumulating => {}
        }
    }
    if config
        .id_offset
        .checked_add(database.len() as DatapointIndex)
        .is_none()
    {
        return Err(BitKnnError::out_of_range("database ids overflow the id space"));
    }
    Ok(())
}

/// Scan every block of `database` into `heaps` with computer `C`.
pub(crate) fn scan_blocks<'q, C: BinaryComputer<'q>>(
    heaps: &mut KnnHeapArray,
    queries: BinaryCodes<'q>,
    database: BinaryCodes<'_>,
    config: &ScanConfig,
    mask: Option<&dyn ExclusionMask>,
) -> BlockScanStats {
    let code_size = queries.code_size();
    let nb = database.len();
    let parallel = config.use_parallel(queries.len());
    let mut stats = BlockScanStats::default();

    for j0 in (0..nb).step_by(config.block_size) {
        let j1 = (j0 + config.block_size).min(nb);
        let block = database.range(j0, j1);
        let first_id = config.id_offset + j0 as DatapointIndex;
        trace!(block = stats.num_blocks, start = j0, end = j1, parallel, "scanning block");

        // Every query tests the same ids against the mask; keep the count
        // seen by the first one.
        let excluded: usize = if parallel {
            heaps
                .par_views_mut()
                .enumerate()
                .map(|(i, mut heap)| {
                    let computer = C::new(queries.code(i), code_size);
                    let skipped = scan_block(&computer, &mut heap, block, first_id, mask);
                    if i == 0 {
                        skipped
                    } else {
                        0
                    }
                })
                .sum()
        } else {
            let mut first = 0;
            for (i, mut heap) in heaps.views_mut().enumerate() {
                let computer = C::new(queries.code(i), code_size);
                let skipped = scan_block(&computer, &mut heap, block, first_id, mask);
                if i == 0 {
                    first = skipped;
                }
            }
            first
        };

        stats.num_excluded += excluded;
        stats.num_blocks += 1;
    }

    stats
}

/// Push every non-excluded code of `block` into one query's heap and
/// return how many codes the mask skipped.
#[inline]
fn scan_block<'q, C: BinaryComputer<'q>>(
    computer: &C,
    heap: &mut MaxHeapMut<'_>,
    block: BinaryCodes<'_>,
    first_id: DatapointIndex,
    mask: Option<&dyn ExclusionMask>,
) -> usize {
    match mask {
        None => {
            for (j, code) in block.iter().enumerate() {
                let distance = computer.compute(code);
                if distance < heap.peek_worst() {
                    heap.replace_worst(distance, first_id + j as DatapointIndex);
                }
            }
            0
        }
        Some(mask) => {
            let mut skipped = 0;
            for (j, code) in block.iter().enumerate() {
                let id = first_id + j as DatapointIndex;
                if mask.is_excluded(id) {
                    skipped += 1;
                    continue;
                }
                let distance = computer.compute(code);
                if distance < heap.peek_worst() {
                    heap.replace_worst(distance, id);
                }
            }
            skipped
        }
    }
}
