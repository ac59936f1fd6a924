//! Owned exclusion bitmap.

use crate::restricts::ExclusionMask;
use crate::types::DatapointIndex;
use bitvec::prelude::*;
use std::collections::HashSet;

/// A mask that excludes the specified ids.
#[derive(Clone, Debug)]
pub struct ExclusionList {
    /// Bitmap of excluded ids.
    bitmap: BitVec,
    /// Number of excluded ids.
    excluded_count: usize,
}

impl ExclusionList {
    /// Create an empty list covering ids `[0, capacity)`.
    pub fn new(capacity: usize) -> Self {
        Self {
            bitmap: bitvec![0; capacity],
            excluded_count: 0,
        }
    }

    /// Create a list from indices.
    pub fn from_indices(indices: &[DatapointIndex], capacity: usize) -> Self {
        let mut list = Self::new(capacity);
        for &idx in indices {
            list.exclude(idx);
        }
        list
    }

    /// Create a list from a HashSet.
    pub fn from_set(set: &HashSet<DatapointIndex>, capacity: usize) -> Self {
        let mut list = Self::new(capacity);
        for &idx in set {
            list.exclude(idx);
        }
        list
    }

    #[inline]
    fn slot(&self, index: DatapointIndex) -> Option<usize> {
        if index < 0 || index as usize >= self.bitmap.len() {
            None
        } else {
            Some(index as usize)
        }
    }

    /// Exclude an id. Out-of-range ids are ignored.
    pub fn exclude(&mut self, index: DatapointIndex) {
        if let Some(i) = self.slot(index) {
            if !self.bitmap[i] {
                self.bitmap.set(i, true);
                self.excluded_count += 1;
            }
        }
    }

    /// Allow an id again.
    pub fn include(&mut self, index: DatapointIndex) {
        if let Some(i) = self.slot(index) {
            if self.bitmap[i] {
                self.bitmap.set(i, false);
                self.excluded_count -= 1;
            }
        }
    }

    /// All excluded ids in increasing order.
    pub fn indices(&self) -> Vec<DatapointIndex> {
        self.bitmap
            .iter_ones()
            .map(|i| i as DatapointIndex)
            .collect()
    }

    /// Clear the list.
    pub fn clear(&mut self) {
        self.bitmap.fill(false);
        self.excluded_count = 0;
    }

    /// Number of ids covered.
    pub fn capacity(&self) -> usize {
        self.bitmap.len()
    }
}

impl ExclusionMask for ExclusionList {
    #[inline]
    fn is_excluded(&self, index: DatapointIndex) -> bool {
        match self.slot(index) {
            Some(i) => self.bitmap[i],
            None => false,
        }
    }

    fn num_excluded(&self) -> Option<usize> {
        Some(self.excluded_count)
    }
}
