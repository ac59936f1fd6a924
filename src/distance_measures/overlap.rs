//! Set-overlap distance formulas.
//!
//! Every computer reduces a comparison to three popcounts: the
//! intersection, the query and the candidate. The metric types here turn
//! those counts into a distance in `[0, 1]`.

/// A distance defined on the popcounts of two binary codes.
pub trait OverlapMetric: Send + Sync + 'static {
    /// Whether `distance` reads the candidate popcount. Computers skip the
    /// extra popcount in the inner loop when it does not.
    const USES_CANDIDATE_POPCOUNT: bool;

    /// Distance from `|A ∩ B|`, `|A|` (query) and `|B|` (candidate).
    fn distance(intersection: u32, query_popcount: u32, candidate_popcount: u32) -> f32;
}

/// Jaccard / Tanimoto distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl OverlapMetric for Jaccard {
    const USES_CANDIDATE_POPCOUNT: bool = true;

    #[inline(always)]
    fn distance(intersection: u32, query_popcount: u32, candidate_popcount: u32) -> f32 {
        let union = query_popcount + candidate_popcount - intersection;
        // Two empty sets are identical.
        if union == 0 {
            return 0.0;
        }
        1.0 - intersection as f32 / union as f32
    }
}

/// Substructure distance: low when the candidate's bits lie inside the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct Substructure;

impl OverlapMetric for Substructure {
    const USES_CANDIDATE_POPCOUNT: bool = true;

    #[inline(always)]
    fn distance(intersection: u32, _query_popcount: u32, candidate_popcount: u32) -> f32 {
        // Checked first: an empty intersection covers the zero denominator.
        if intersection == 0 {
            return 1.0;
        }
        1.0 - intersection as f32 / candidate_popcount as f32
    }
}

/// Superstructure distance: low when the query's bits lie inside the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Superstructure;

impl OverlapMetric for Superstructure {
    const USES_CANDIDATE_POPCOUNT: bool = false;

    #[inline(always)]
    fn distance(intersection: u32, query_popcount: u32, _candidate_popcount: u32) -> f32 {
        if intersection == 0 {
            return 1.0;
        }
        1.0 - intersection as f32 / query_popcount as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_formula() {
        assert_eq!(Jaccard::distance(0, 0, 0), 0.0);
        assert_eq!(Jaccard::distance(0, 3, 5), 1.0);
        assert_eq!(Jaccard::distance(4, 4, 4), 0.0);
        // |A ∩ B| = 2, |A ∪ B| = 4 + 6 - 2 = 8
        assert!((Jaccard::distance(2, 4, 6) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_substructure_formula() {
        assert_eq!(Substructure::distance(0, 0, 0), 1.0);
        assert_eq!(Substructure::distance(0, 10, 0), 1.0);
        assert_eq!(Substructure::distance(0, 0, 10), 1.0);
        assert_eq!(Substructure::distance(5, 20, 5), 0.0);
        assert!((Substructure::distance(1, 1, 4) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_superstructure_formula() {
        assert_eq!(Superstructure::distance(0, 0, 0), 1.0);
        assert_eq!(Superstructure::distance(0, 0, 7), 1.0);
        assert_eq!(Superstructure::distance(5, 5, 20), 0.0);
        assert!((Superstructure::distance(1, 4, 1) - 0.75).abs() < 1e-6);
    }
}
