//! Binary code batches.
//!
//! A batch is a contiguous run of codes of identical width, addressed by a
//! 0-based position. `BinaryCodes` borrows a caller buffer, `BinaryDataset`
//! owns one.

use crate::error::{BitKnnError, Result};
use crate::types::DatapointIndex;
use crate::utils::bits::{pack_bits, BitIterator};

/// A borrowed batch of fixed-width binary codes.
#[derive(Debug, Clone, Copy)]
pub struct BinaryCodes<'a> {
    data: &'a [u8],
    code_size: usize,
}

impl<'a> BinaryCodes<'a> {
    /// Wrap a buffer of `data.len() / code_size` codes.
    ///
    /// The layout is checked here, once, so the scan never re-validates
    /// individual codes.
    pub fn new(data: &'a [u8], code_size: usize) -> Result<Self> {
        if code_size == 0 {
            return Err(BitKnnError::invalid_argument("code size must be > 0"));
        }
        if data.len() % code_size != 0 {
            return Err(BitKnnError::invalid_argument(format!(
                "buffer of {} bytes is not a whole number of {}-byte codes",
                data.len(),
                code_size
            )));
        }
        Ok(Self { data, code_size })
    }

    /// Number of codes in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.code_size
    }

    /// Check if the batch holds no codes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Code width in bytes.
    #[inline]
    pub fn code_size(&self) -> usize {
        self.code_size
    }

    /// Raw bytes of the whole batch.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Code at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    #[inline]
    pub fn code(&self, position: usize) -> &'a [u8] {
        &self.data[position * self.code_size..(position + 1) * self.code_size]
    }

    /// Code at `position`, or `None` when out of range.
    pub fn get(&self, position: usize) -> Option<&'a [u8]> {
        if position < self.len() {
            Some(self.code(position))
        } else {
            None
        }
    }

    /// Sub-batch of the codes in `[start, end)`.
    #[inline]
    pub fn range(&self, start: usize, end: usize) -> BinaryCodes<'a> {
        debug_assert!(start <= end && end <= self.len());
        BinaryCodes {
            data: &self.data[start * self.code_size..end * self.code_size],
            code_size: self.code_size,
        }
    }

    /// Iterate over the codes in order.
    pub fn iter(&self) -> std::slice::ChunksExact<'a, u8> {
        self.data.chunks_exact(self.code_size)
    }

    /// Bits of the code at `position`, least significant bit of each byte first.
    pub fn bits(&self, position: usize) -> BitIterator<'a> {
        BitIterator::new(self.code(position))
    }
}

/// An owned batch of fixed-width binary codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryDataset {
    data: Vec<u8>,
    code_size: usize,
}

impl BinaryDataset {
    /// Create an empty dataset of `code_size`-byte codes.
    pub fn new(code_size: usize) -> Result<Self> {
        if code_size == 0 {
            return Err(BitKnnError::invalid_argument("code size must be > 0"));
        }
        Ok(Self {
            data: Vec::new(),
            code_size,
        })
    }

    /// Create a dataset with room for `capacity` codes.
    pub fn with_capacity(code_size: usize, capacity: usize) -> Result<Self> {
        let mut dataset = Self::new(code_size)?;
        dataset.data.reserve(capacity * code_size);
        Ok(dataset)
    }

    /// Take ownership of a packed buffer.
    pub fn from_bytes(data: Vec<u8>, code_size: usize) -> Result<Self> {
        BinaryCodes::new(&data, code_size)?;
        Ok(Self { data, code_size })
    }

    /// Build from one vector per code. All codes must share a width.
    pub fn from_vecs(codes: Vec<Vec<u8>>) -> Result<Self> {
        let code_size = codes.first().map(|c| c.len()).unwrap_or(0);
        let mut dataset = Self::with_capacity(code_size, codes.len())?;
        for code in &codes {
            dataset.push(code)?;
        }
        Ok(dataset)
    }

    /// Append a code and return its position.
    pub fn push(&mut self, code: &[u8]) -> Result<DatapointIndex> {
        if code.len() != self.code_size {
            return Err(BitKnnError::invalid_argument(format!(
                "code of {} bytes pushed into a dataset of {}-byte codes",
                code.len(),
                self.code_size
            )));
        }
        let position = self.len() as DatapointIndex;
        self.data.extend_from_slice(code);
        Ok(position)
    }

    /// Append a code given as one flag per bit; missing trailing bits are 0.
    pub fn push_bits(&mut self, bits: &[bool]) -> Result<DatapointIndex> {
        if bits.len() > self.code_size * 8 {
            return Err(BitKnnError::invalid_argument(format!(
                "{} bits do not fit a {}-byte code",
                bits.len(),
                self.code_size
            )));
        }
        let mut code = pack_bits(bits);
        code.resize(self.code_size, 0);
        self.push(&code)
    }

    /// Code at `position`, or `None` when out of range.
    pub fn get(&self, position: usize) -> Option<&[u8]> {
        self.as_codes().get(position)
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.data.len() / self.code_size
    }

    /// Check if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Code width in bytes.
    pub fn code_size(&self) -> usize {
        self.code_size
    }

    /// Borrow the dataset as a code batch.
    pub fn as_codes(&self) -> BinaryCodes<'_> {
        BinaryCodes {
            data: &self.data,
            code_size: self.code_size,
        }
    }
}
