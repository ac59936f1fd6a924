//! Distance computers bound to a single query code.
//!
//! A computer caches what it needs from the query once and is then called
//! for every candidate of a scan. Widths of 16, 32, 64 and 128 bytes unpack
//! the query into a fixed array of words so the candidate loop is fully
//! unrolled; every other width walks the bytes.

use super::overlap::{Jaccard, OverlapMetric, Substructure, Superstructure};
use crate::utils::bits::{and_popcount_bytes, load_word, load_words, popcount_bytes};
use std::marker::PhantomData;

/// A distance kernel bound to one query code.
pub trait BinaryComputer<'a>: Sized {
    /// Bind to `query`, which is exactly `code_size` bytes long.
    fn new(query: &'a [u8], code_size: usize) -> Self;

    /// Distance from the bound query to `candidate`.
    fn compute(&self, candidate: &[u8]) -> f32;
}

/// Word-unrolled computer for codes of exactly `WORDS * 8` bytes.
#[derive(Debug, Clone)]
pub struct FixedWidthComputer<M: OverlapMetric, const WORDS: usize> {
    words: [u64; WORDS],
    query_popcount: u32,
    _metric: PhantomData<M>,
}

impl<M: OverlapMetric, const WORDS: usize> FixedWidthComputer<M, WORDS> {
    /// Code size in bytes handled by this computer.
    pub const CODE_SIZE: usize = WORDS * 8;
}

impl<'a, M: OverlapMetric, const WORDS: usize> BinaryComputer<'a> for FixedWidthComputer<M, WORDS> {
    #[inline]
    fn new(query: &'a [u8], code_size: usize) -> Self {
        debug_assert_eq!(code_size, WORDS * 8);
        debug_assert_eq!(query.len(), WORDS * 8);
        let words: [u64; WORDS] = load_words(query);
        let query_popcount = words.iter().map(|w| w.count_ones()).sum();
        Self {
            words,
            query_popcount,
            _metric: PhantomData,
        }
    }

    #[inline(always)]
    fn compute(&self, candidate: &[u8]) -> f32 {
        debug_assert_eq!(candidate.len(), WORDS * 8);
        let mut intersection = 0u32;
        let mut candidate_popcount = 0u32;
        for i in 0..WORDS {
            let b = load_word(candidate, i);
            intersection += (b & self.words[i]).count_ones();
            if M::USES_CANDIDATE_POPCOUNT {
                candidate_popcount += b.count_ones();
            }
        }
        M::distance(intersection, self.query_popcount, candidate_popcount)
    }
}

/// Byte-wise computer for arbitrary code widths.
#[derive(Debug, Clone)]
pub struct GenericComputer<'a, M: OverlapMetric> {
    query: &'a [u8],
    query_popcount: u32,
    _metric: PhantomData<M>,
}

impl<'a, M: OverlapMetric> BinaryComputer<'a> for GenericComputer<'a, M> {
    #[inline]
    fn new(query: &'a [u8], code_size: usize) -> Self {
        debug_assert_eq!(query.len(), code_size);
        Self {
            query,
            query_popcount: popcount_bytes(query),
            _metric: PhantomData,
        }
    }

    #[inline]
    fn compute(&self, candidate: &[u8]) -> f32 {
        debug_assert_eq!(candidate.len(), self.query.len());
        let intersection = and_popcount_bytes(self.query, candidate);
        let candidate_popcount = if M::USES_CANDIDATE_POPCOUNT {
            popcount_bytes(candidate)
        } else {
            0
        };
        M::distance(intersection, self.query_popcount, candidate_popcount)
    }
}

pub type JaccardComputer16 = FixedWidthComputer<Jaccard, 2>;
pub type JaccardComputer32 = FixedWidthComputer<Jaccard, 4>;
pub type JaccardComputer64 = FixedWidthComputer<Jaccard, 8>;
pub type JaccardComputer128 = FixedWidthComputer<Jaccard, 16>;
pub type JaccardComputerDefault<'a> = GenericComputer<'a, Jaccard>;

pub type SubstructureComputer16 = FixedWidthComputer<Substructure, 2>;
pub type SubstructureComputer32 = FixedWidthComputer<Substructure, 4>;
pub type SubstructureComputer64 = FixedWidthComputer<Substructure, 8>;
pub type SubstructureComputer128 = FixedWidthComputer<Substructure, 16>;
pub type SubstructureComputerDefault<'a> = GenericComputer<'a, Substructure>;

pub type SuperstructureComputer16 = FixedWidthComputer<Superstructure, 2>;
pub type SuperstructureComputer32 = FixedWidthComputer<Superstructure, 4>;
pub type SuperstructureComputer64 = FixedWidthComputer<Superstructure, 8>;
pub type SuperstructureComputer128 = FixedWidthComputer<Superstructure, 16>;
pub type SuperstructureComputerDefault<'a> = GenericComputer<'a, Superstructure>;
