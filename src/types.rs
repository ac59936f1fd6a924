//! Core type definitions for bitknn.
//!
//! This module contains the fundamental type aliases shared by the kernels,
//! the heap array and the exclusion masks.

/// Index type for database codes.
///
/// Signed so that the heap array can carry `INVALID_INDEX` in slots that
/// have not been filled by a real candidate yet.
pub type DatapointIndex = i64;

/// Sentinel id stored in empty heap slots.
pub const INVALID_INDEX: DatapointIndex = -1;

/// Distance stored in empty heap slots. Every real distance is below it,
/// so the first `k` scanned candidates are always admitted.
pub const NEUTRAL_DISTANCE: f32 = f32::MAX;

/// A nearest neighbor result: (distance, index).
pub type NNResultPair = (f32, DatapointIndex);

/// Vector of nearest neighbor results.
pub type NNResultsVector = Vec<NNResultPair>;

/// Check whether a heap slot holds a real candidate.
#[inline]
pub fn is_valid_index(index: DatapointIndex) -> bool {
    index != INVALID_INDEX
}
