//! Atomic bitset shared between the caller and scan workers.

use crate::restricts::ExclusionMask;
use crate::types::DatapointIndex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed-capacity bitset that can be marked through `&self`.
///
/// Bits are typically set by the owner of the index (deletes) while no
/// scan is running and then tested concurrently by every scan worker.
/// Ids outside `[0, capacity)` are never excluded.
#[derive(Debug)]
pub struct ConcurrentBitset {
    words: Vec<AtomicU64>,
    capacity: usize,
}

impl ConcurrentBitset {
    /// Create a bitset with every bit clear.
    pub fn new(capacity: usize) -> Self {
        let num_words = (capacity + 63) / 64;
        Self {
            words: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
            capacity,
        }
    }

    /// Create a bitset with the given ids set.
    pub fn from_indices(indices: &[DatapointIndex], capacity: usize) -> Self {
        let bitset = Self::new(capacity);
        for &idx in indices {
            bitset.set(idx);
        }
        bitset
    }

    #[inline]
    fn locate(&self, index: DatapointIndex) -> Option<(usize, u64)> {
        if index < 0 || index as usize >= self.capacity {
            return None;
        }
        let i = index as usize;
        Some((i / 64, 1u64 << (i % 64)))
    }

    /// Set the bit for `index`. Out-of-range ids are ignored.
    pub fn set(&self, index: DatapointIndex) {
        if let Some((word, mask)) = self.locate(index) {
            self.words[word].fetch_or(mask, Ordering::Release);
        }
    }

    /// Clear the bit for `index`. Out-of-range ids are ignored.
    pub fn clear(&self, index: DatapointIndex) {
        if let Some((word, mask)) = self.locate(index) {
            self.words[word].fetch_and(!mask, Ordering::Release);
        }
    }

    /// Test the bit for `index`.
    #[inline]
    pub fn test(&self, index: DatapointIndex) -> bool {
        match self.locate(index) {
            Some((word, mask)) => self.words[word].load(Ordering::Acquire) & mask != 0,
            None => false,
        }
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    /// Clear every bit.
    pub fn clear_all(&self) {
        for w in &self.words {
            w.store(0, Ordering::Release);
        }
    }

    /// Number of ids covered.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl ExclusionMask for ConcurrentBitset {
    #[inline]
    fn is_excluded(&self, index: DatapointIndex) -> bool {
        self.test(index)
    }

    fn num_excluded(&self) -> Option<usize> {
        Some(self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_set_clear() {
        let bitset = ConcurrentBitset::new(130);
        bitset.set(0);
        bitset.set(64);
        bitset.set(129);
        bitset.set(130);
        bitset.set(-1);

        assert!(bitset.test(0));
        assert!(bitset.test(64));
        assert!(bitset.test(129));
        assert!(!bitset.test(130));
        assert!(!bitset.test(-1));
        assert_eq!(bitset.count(), 3);

        bitset.clear(64);
        assert!(!bitset.test(64));
        assert_eq!(bitset.count(), 2);

        bitset.clear_all();
        assert_eq!(bitset.count(), 0);
    }

    #[test]
    fn test_concurrent_marking() {
        let bitset = ConcurrentBitset::new(10_000);
        (0..10_000i64).into_par_iter().filter(|i| i % 3 == 0).for_each(|i| bitset.set(i));
        assert_eq!(bitset.count(), (0..10_000).filter(|i| i % 3 == 0).count());
        assert!((0..10_000i64).into_par_iter().all(|i| bitset.is_excluded(i) == (i % 3 == 0)));
    }

    #[test]
    fn test_from_indices() {
        let bitset = ConcurrentBitset::from_indices(&[1, 3, 3, 20], 10);
        assert_eq!(bitset.num_excluded(), Some(2));
        assert_eq!(bitset.capacity(), 10);
    }
}
