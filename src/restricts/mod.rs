//! Exclusion masks for the scan.
//!
//! A mask marks database ids that must never appear in a result, e.g.
//! soft-deleted items. The scan only ever reads a mask; it is shared by
//! every worker thread for the duration of a call.
//!
//! - [`ConcurrentBitset`]: atomic words, markable through a shared reference
//! - [`ExclusionList`]: owned bitmap, markable through `&mut`
//! - [`PredicateMask`]: any thread-safe closure

mod bitset;
mod exclusion_list;

pub use bitset::ConcurrentBitset;
pub use exclusion_list::ExclusionList;

use crate::types::DatapointIndex;

/// Read-only, thread-safe test over database ids.
pub trait ExclusionMask: Send + Sync {
    /// Check if `index` must be skipped.
    fn is_excluded(&self, index: DatapointIndex) -> bool;

    /// Number of excluded ids, if known.
    fn num_excluded(&self) -> Option<usize> {
        None
    }
}

impl<M: ExclusionMask + ?Sized> ExclusionMask for &M {
    #[inline]
    fn is_excluded(&self, index: DatapointIndex) -> bool {
        (**self).is_excluded(index)
    }

    fn num_excluded(&self) -> Option<usize> {
        (**self).num_excluded()
    }
}

impl<M: ExclusionMask + ?Sized> ExclusionMask for std::sync::Arc<M> {
    #[inline]
    fn is_excluded(&self, index: DatapointIndex) -> bool {
        (**self).is_excluded(index)
    }

    fn num_excluded(&self) -> Option<usize> {
        (**self).num_excluded()
    }
}

/// Predicate-based mask.
pub struct PredicateMask<F>
where
    F: Fn(DatapointIndex) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> PredicateMask<F>
where
    F: Fn(DatapointIndex) -> bool + Send + Sync,
{
    /// Create a mask excluding every id for which `predicate` returns true.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> ExclusionMask for PredicateMask<F>
where
    F: Fn(DatapointIndex) -> bool + Send + Sync,
{
    #[inline]
    fn is_excluded(&self, index: DatapointIndex) -> bool {
        (self.predicate)(index)
    }
}
