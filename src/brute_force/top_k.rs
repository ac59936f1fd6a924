//! Bounded top-k heaps for batched scans.
//!
//! Results for a batch of queries live in two contiguous buffers of
//! `num_heaps * k` distances and ids. Each query owns the disjoint `k`-slot
//! window at `i * k`, viewed through a [`MaxHeapMut`]. The window is a
//! max-heap on distance: the root is the worst of the `k` best candidates
//! seen so far and is the eviction threshold for the next one.
//!
//! Equal distances are not ordered by id. Which of several tied candidates
//! survives eviction depends on the heap layout, so callers must not rely
//! on a particular tie-break.

use crate::error::{BitKnnError, Result};
use crate::types::{is_valid_index, DatapointIndex, NNResultsVector, INVALID_INDEX, NEUTRAL_DISTANCE};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

/// Lifecycle of a heap array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapState {
    /// Storage allocated, never reset.
    Uninitialized,
    /// Every slot holds the neutral entry.
    Heapified,
    /// At least one scan has inserted candidates.
    Accumulating,
    /// Sorted ascending; no longer a heap.
    Finalized,
}

/// Top-k results for a batch of queries.
#[derive(Debug, Clone)]
pub struct KnnHeapArray {
    num_heaps: usize,
    k: usize,
    distances: Vec<f32>,
    ids: Vec<DatapointIndex>,
    state: HeapState,
}

impl KnnHeapArray {
    /// Allocate `num_heaps` heaps of capacity `k`.
    pub fn new(num_heaps: usize, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(BitKnnError::invalid_argument("k must be >= 1"));
        }
        let len = num_heaps.checked_mul(k).ok_or_else(|| {
            BitKnnError::out_of_range(format!("{} heaps of {} slots overflow", num_heaps, k))
        })?;
        Ok(Self {
            num_heaps,
            k,
            distances: vec![NEUTRAL_DISTANCE; len],
            ids: vec![INVALID_INDEX; len],
            state: HeapState::Uninitialized,
        })
    }

    /// Number of heaps (queries).
    pub fn num_heaps(&self) -> usize {
        self.num_heaps
    }

    /// Capacity of each heap.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HeapState {
        self.state
    }

    /// Reset every heap to the empty state.
    pub fn heapify(&mut self) {
        self.distances.fill(NEUTRAL_DISTANCE);
        self.ids.fill(INVALID_INDEX);
        self.state = HeapState::Heapified;
    }

    pub(crate) fn mark_accumulating(&mut self) {
        self.state = HeapState::Accumulating;
    }

    /// Mutable view of heap `i`, for feeding candidates by hand.
    ///
    /// Fails unless the array has been heapified and not yet reordered.
    /// Handing out a view moves the array to `Accumulating`.
    pub fn heap_mut(&mut self, i: usize) -> Result<MaxHeapMut<'_>> {
        if i >= self.num_heaps {
            return Err(BitKnnError::out_of_range(format!(
                "heap {} of {}",
                i, self.num_heaps
            )));
        }
        self.check_insertable()?;
        self.state = HeapState::Accumulating;
        let range = i * self.k..(i + 1) * self.k;
        Ok(MaxHeapMut {
            distances: &mut self.distances[range.clone()],
            ids: &mut self.ids[range],
        })
    }

    /// Disjoint mutable views of every heap, in query order.
    ///
    /// Same preconditions as [`heap_mut`](Self::heap_mut).
    pub fn heaps_mut(&mut self) -> Result<impl Iterator<Item = MaxHeapMut<'_>> + '_> {
        self.check_insertable()?;
        self.state = HeapState::Accumulating;
        Ok(self.views_mut())
    }

    /// Disjoint mutable views of every heap for parallel workers.
    ///
    /// Same preconditions as [`heap_mut`](Self::heap_mut).
    pub fn par_heaps_mut(
        &mut self,
    ) -> Result<impl IndexedParallelIterator<Item = MaxHeapMut<'_>> + '_> {
        self.check_insertable()?;
        self.state = HeapState::Accumulating;
        Ok(self.par_views_mut())
    }

    fn check_insertable(&self) -> Result<()> {
        match self.state {
            HeapState::Heapified | HeapState::Accumulating => Ok(()),
            HeapState::Uninitialized => Err(BitKnnError::failed_precondition(
                "heaps were never initialized; call heapify() first",
            )),
            HeapState::Finalized => Err(BitKnnError::failed_precondition(
                "heaps were already reordered and can no longer accept candidates",
            )),
        }
    }

    /// Views without the state check; the scan validates up front.
    pub(crate) fn views_mut(&mut self) -> impl Iterator<Item = MaxHeapMut<'_>> + '_ {
        self.distances
            .chunks_mut(self.k)
            .zip(self.ids.chunks_mut(self.k))
            .map(|(distances, ids)| MaxHeapMut { distances, ids })
    }

    pub(crate) fn par_views_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = MaxHeapMut<'_>> + '_ {
        self.distances
            .par_chunks_mut(self.k)
            .zip(self.ids.par_chunks_mut(self.k))
            .map(|(distances, ids)| MaxHeapMut { distances, ids })
    }

    /// Sort every heap ascending by distance. Terminal: the windows stop
    /// being heaps and no view is handed out afterwards.
    pub fn reorder(&mut self) {
        self.par_views_mut().for_each(|mut heap| heap.reorder());
        self.state = HeapState::Finalized;
    }

    /// Raw distance slots of heap `i`.
    pub fn distances(&self, i: usize) -> &[f32] {
        &self.distances[i * self.k..(i + 1) * self.k]
    }

    /// Raw id slots of heap `i`.
    pub fn ids(&self, i: usize) -> &[DatapointIndex] {
        &self.ids[i * self.k..(i + 1) * self.k]
    }

    /// Filled slots of heap `i`, in storage order.
    ///
    /// After [`reorder`](Self::reorder) this is ascending by distance.
    pub fn results(&self, i: usize) -> NNResultsVector {
        self.distances(i)
            .iter()
            .zip(self.ids(i))
            .filter(|(_, &id)| is_valid_index(id))
            .map(|(&d, &id)| (d, id))
            .collect()
    }

    /// Filled slots of heap `i`, sorted ascending without touching the heap.
    pub fn sorted_results(&self, i: usize) -> NNResultsVector {
        let mut results = self.results(i);
        results.sort_by_key(|&(d, _)| OrderedFloat(d));
        results
    }

    /// Filled slots of every heap.
    pub fn all_results(&self) -> Vec<NNResultsVector> {
        (0..self.num_heaps).map(|i| self.results(i)).collect()
    }
}

/// One query's `k` result slots, kept as a max-heap on distance.
#[derive(Debug)]
pub struct MaxHeapMut<'a> {
    distances: &'a mut [f32],
    ids: &'a mut [DatapointIndex],
}

impl<'a> MaxHeapMut<'a> {
    /// Capacity of the heap.
    #[inline]
    pub fn k(&self) -> usize {
        self.distances.len()
    }

    /// Reset to the empty state.
    pub fn heapify(&mut self) {
        self.distances.fill(NEUTRAL_DISTANCE);
        self.ids.fill(INVALID_INDEX);
    }

    /// The current k-th best distance: candidates must beat it to enter.
    #[inline(always)]
    pub fn peek_worst(&self) -> f32 {
        self.distances[0]
    }

    /// Id stored alongside [`peek_worst`](Self::peek_worst).
    #[inline]
    pub fn peek_worst_id(&self) -> DatapointIndex {
        self.ids[0]
    }

    /// Evict the worst entry and insert `(distance, id)` in one sift.
    #[inline]
    pub fn replace_worst(&mut self, distance: f32, id: DatapointIndex) {
        self.distances[0] = distance;
        self.ids[0] = id;
        let k = self.k();
        self.sift_down(0, k);
    }

    /// Insert `(distance, id)` if it beats the current worst entry.
    #[inline(always)]
    pub fn push(&mut self, distance: f32, id: DatapointIndex) -> bool {
        if distance < self.distances[0] {
            self.replace_worst(distance, id);
            true
        } else {
            false
        }
    }

    /// Sort ascending by distance in place; empty slots end up last.
    pub(crate) fn reorder(&mut self) {
        for end in (1..self.k()).rev() {
            self.distances.swap(0, end);
            self.ids.swap(0, end);
            self.sift_down(0, end);
        }
    }

    /// Distance slots.
    pub fn distances(&self) -> &[f32] {
        self.distances
    }

    /// Id slots.
    pub fn ids(&self) -> &[DatapointIndex] {
        self.ids
    }

    /// Sift down over the first `len` slots to restore the max-heap property.
    #[inline]
    fn sift_down(&mut self, mut pos: usize, len: usize) {
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut largest = pos;

            if left < len && self.distances[left] > self.distances[largest] {
                largest = left;
            }
            if right < len && self.distances[right] > self.distances[largest] {
                largest = right;
            }

            if largest == pos {
                break;
            }
            self.distances.swap(pos, largest);
            self.ids.swap(pos, largest);
            pos = largest;
        }
    }
}
