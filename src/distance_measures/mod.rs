//! Distance measures for binary codes.
//!
//! This module provides the set-overlap metrics over bit-packed codes and
//! the per-query computers the scan driver instantiates for them.

mod computer;
mod metric;
mod overlap;

pub use computer::*;
pub use metric::{BinaryMetric, CodeWidth, MetricType};
pub use overlap::{Jaccard, OverlapMetric, Substructure, Superstructure};

/// Compute a single distance between two codes of equal length.
///
/// Uses the byte-wise computers, so it doubles as the reference the
/// specialized widths are checked against. Returns `None` for metrics the
/// binary kernel does not implement.
pub fn binary_distance(metric: MetricType, a: &[u8], b: &[u8]) -> Option<f32> {
    debug_assert_eq!(a.len(), b.len());
    let distance = match metric.binary_family()? {
        BinaryMetric::Jaccard => JaccardComputerDefault::new(a, a.len()).compute(b),
        BinaryMetric::Substructure => SubstructureComputerDefault::new(a, a.len()).compute(b),
        BinaryMetric::Superstructure => SuperstructureComputerDefault::new(a, a.len()).compute(b),
    };
    Some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_distance() {
        let a = [0b0000_1111u8, 0];
        let b = [0b0000_0011u8, 0];
        assert_eq!(binary_distance(MetricType::Substructure, &a, &b), Some(0.0));
        assert_eq!(binary_distance(MetricType::Superstructure, &a, &b), Some(0.5));
        assert_eq!(binary_distance(MetricType::Tanimoto, &a, &b), Some(0.5));
        assert_eq!(
            binary_distance(MetricType::Jaccard, &a, &b),
            binary_distance(MetricType::Tanimoto, &a, &b)
        );
        assert_eq!(binary_distance(MetricType::Hamming, &a, &b), None);
    }

    #[test]
    fn test_superstructure_mirrors_substructure() {
        let a = [0b1010_1010u8, 0b1111_0000, 0x01];
        let b = [0b1000_0010u8, 0b0011_0000, 0x03];
        assert_eq!(
            binary_distance(MetricType::Superstructure, &a, &b),
            binary_distance(MetricType::Substructure, &b, &a)
        );
    }
}
