//! Metric selectors and code widths.

use crate::error::{BitKnnError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metric selector handed in by the caller.
///
/// The enclosing index library knows more metrics than this kernel computes.
/// Only the binary set-overlap family (`Jaccard`, `Tanimoto`, `Substructure`,
/// `Superstructure`) is recognized by the scan; the others take the
/// unsupported-metric path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// Squared Euclidean distance over float vectors.
    L2,
    /// Inner product over float vectors.
    InnerProduct,
    /// Hamming distance over binary codes.
    Hamming,
    /// Jaccard distance: `1 - |A ∩ B| / |A ∪ B|`.
    Jaccard,
    /// Tanimoto distance; identical to Jaccard on binary codes.
    Tanimoto,
    /// Substructure distance: `1 - |A ∩ B| / |B|`.
    Substructure,
    /// Superstructure distance: `1 - |A ∩ B| / |A|`.
    Superstructure,
}

impl MetricType {
    /// Map the selector onto the computer family the kernel implements.
    pub fn binary_family(&self) -> Option<BinaryMetric> {
        match self {
            MetricType::Jaccard | MetricType::Tanimoto => Some(BinaryMetric::Jaccard),
            MetricType::Substructure => Some(BinaryMetric::Substructure),
            MetricType::Superstructure => Some(BinaryMetric::Superstructure),
            MetricType::L2 | MetricType::InnerProduct | MetricType::Hamming => None,
        }
    }

    /// Check whether the binary kernel can compute this metric.
    pub fn is_supported(&self) -> bool {
        self.binary_family().is_some()
    }

    /// Get the name of this metric.
    pub fn name(&self) -> &'static str {
        match self {
            MetricType::L2 => "L2",
            MetricType::InnerProduct => "IP",
            MetricType::Hamming => "HAMMING",
            MetricType::Jaccard => "JACCARD",
            MetricType::Tanimoto => "TANIMOTO",
            MetricType::Substructure => "SUBSTRUCTURE",
            MetricType::Superstructure => "SUPERSTRUCTURE",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MetricType {
    type Err = BitKnnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L2" => Ok(MetricType::L2),
            "IP" | "INNER_PRODUCT" => Ok(MetricType::InnerProduct),
            "HAMMING" => Ok(MetricType::Hamming),
            "JACCARD" => Ok(MetricType::Jaccard),
            "TANIMOTO" => Ok(MetricType::Tanimoto),
            "SUBSTRUCTURE" => Ok(MetricType::Substructure),
            "SUPERSTRUCTURE" => Ok(MetricType::Superstructure),
            other => Err(BitKnnError::invalid_argument(format!(
                "unknown metric type '{}'",
                other
            ))),
        }
    }
}

/// Computer family actually implemented by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryMetric {
    /// Jaccard / Tanimoto.
    Jaccard,
    /// Query contained in candidate.
    Substructure,
    /// Candidate contained in query.
    Superstructure,
}

/// Code width, specialized or generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeWidth {
    /// 16 bytes (2 words).
    Bytes16,
    /// 32 bytes (4 words).
    Bytes32,
    /// 64 bytes (8 words).
    Bytes64,
    /// 128 bytes (16 words).
    Bytes128,
    /// Any other width, scanned byte by byte.
    Generic(usize),
}

impl CodeWidth {
    /// Select the width variant for a code size in bytes.
    pub fn from_code_size(code_size: usize) -> Self {
        match code_size {
            16 => CodeWidth::Bytes16,
            32 => CodeWidth::Bytes32,
            64 => CodeWidth::Bytes64,
            128 => CodeWidth::Bytes128,
            n => CodeWidth::Generic(n),
        }
    }

    /// Code size in bytes.
    pub fn code_size(&self) -> usize {
        match self {
            CodeWidth::Bytes16 => 16,
            CodeWidth::Bytes32 => 32,
            CodeWidth::Bytes64 => 64,
            CodeWidth::Bytes128 => 128,
            CodeWidth::Generic(n) => *n,
        }
    }

    /// Whether this width has a word-unrolled computer.
    pub fn is_specialized(&self) -> bool {
        !matches!(self, CodeWidth::Generic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_family() {
        assert_eq!(MetricType::Tanimoto.binary_family(), Some(BinaryMetric::Jaccard));
        assert_eq!(MetricType::Jaccard.binary_family(), Some(BinaryMetric::Jaccard));
        assert_eq!(
            MetricType::Superstructure.binary_family(),
            Some(BinaryMetric::Superstructure)
        );
        assert!(!MetricType::L2.is_supported());
        assert!(!MetricType::Hamming.is_supported());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("jaccard".parse::<MetricType>().unwrap(), MetricType::Jaccard);
        assert_eq!(" Substructure ".parse::<MetricType>().unwrap(), MetricType::Substructure);
        assert_eq!("IP".parse::<MetricType>().unwrap(), MetricType::InnerProduct);
        assert!("cosine".parse::<MetricType>().is_err());
    }

    #[test]
    fn test_metric_name_round_trip() {
        for metric in [
            MetricType::L2,
            MetricType::InnerProduct,
            MetricType::Hamming,
            MetricType::Jaccard,
            MetricType::Tanimoto,
            MetricType::Substructure,
            MetricType::Superstructure,
        ] {
            assert_eq!(metric.to_string().parse::<MetricType>().unwrap(), metric);
        }
    }

    #[test]
    fn test_code_width() {
        assert_eq!(CodeWidth::from_code_size(16), CodeWidth::Bytes16);
        assert_eq!(CodeWidth::from_code_size(128), CodeWidth::Bytes128);
        assert_eq!(CodeWidth::from_code_size(24), CodeWidth::Generic(24));
        assert_eq!(CodeWidth::from_code_size(24).code_size(), 24);
        assert!(CodeWidth::Bytes64.is_specialized());
        assert!(!CodeWidth::Generic(8).is_specialized());
    }
}
