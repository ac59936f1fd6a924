//! Metric and width dispatch.
//!
//! The (metric, width) pair is resolved once per scan into a concrete
//! computer type; the block loop is then monomorphized for it, so no
//! comparison goes through dynamic dispatch.

use super::scan::{scan_blocks, BlockScanStats};
use super::top_k::KnnHeapArray;
use crate::config::ScanConfig;
use crate::data_format::BinaryCodes;
use crate::distance_measures::{
    BinaryMetric, CodeWidth, FixedWidthComputer, GenericComputer, Jaccard, OverlapMetric,
    Substructure, Superstructure,
};
use crate::restricts::ExclusionMask;

/// Run the block scan with the computer selected for `metric` and `width`.
pub(crate) fn dispatch_scan<'q>(
    metric: BinaryMetric,
    width: CodeWidth,
    heaps: &mut KnnHeapArray,
    queries: BinaryCodes<'q>,
    database: BinaryCodes<'_>,
    config: &ScanConfig,
    mask: Option<&dyn ExclusionMask>,
) -> BlockScanStats {
    match metric {
        BinaryMetric::Jaccard => {
            scan_family::<Jaccard>(width, heaps, queries, database, config, mask)
        }
        BinaryMetric::Substructure => {
            scan_family::<Substructure>(width, heaps, queries, database, config, mask)
        }
        BinaryMetric::Superstructure => {
            scan_family::<Superstructure>(width, heaps, queries, database, config, mask)
        }
    }
}

fn scan_family<'q, M: OverlapMetric>(
    width: CodeWidth,
    heaps: &mut KnnHeapArray,
    queries: BinaryCodes<'q>,
    database: BinaryCodes<'_>,
    config: &ScanConfig,
    mask: Option<&dyn ExclusionMask>,
) -> BlockScanStats {
    match width {
        CodeWidth::Bytes16 => {
            scan_blocks::<FixedWidthComputer<M, 2>>(heaps, queries, database, config, mask)
        }
        CodeWidth::Bytes32 => {
            scan_blocks::<FixedWidthComputer<M, 4>>(heaps, queries, database, config, mask)
        }
        CodeWidth::Bytes64 => {
            scan_blocks::<FixedWidthComputer<M, 8>>(heaps, queries, database, config, mask)
        }
        CodeWidth::Bytes128 => {
            scan_blocks::<FixedWidthComputer<M, 16>>(heaps, queries, database, config, mask)
        }
        CodeWidth::Generic(_) => {
            scan_blocks::<GenericComputer<'q, M>>(heaps, queries, database, config, mask)
        }
    }
}
