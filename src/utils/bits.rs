//! Bit manipulation utilities.

/// Count the number of set bits (popcount) in a byte slice.
#[inline]
pub fn popcount_bytes(data: &[u8]) -> u32 {
    data.iter().map(|&b| b.count_ones()).sum()
}

/// Count the bits set in both byte slices.
#[inline]
pub fn and_popcount_bytes(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x & y).count_ones())
        .sum()
}

/// Load the `i`-th 64-bit word of a packed code.
///
/// Little-endian on every target. Popcounts only ever combine words loaded
/// the same way, so the byte order never changes a distance.
#[inline(always)]
pub fn load_word(code: &[u8], i: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&code[i * 8..i * 8 + 8]);
    u64::from_le_bytes(word)
}

/// Unpack a code of exactly `N * 8` bytes into `N` words.
#[inline(always)]
pub fn load_words<const N: usize>(code: &[u8]) -> [u64; N] {
    debug_assert_eq!(code.len(), N * 8);
    let mut words = [0u64; N];
    for (i, w) in words.iter_mut().enumerate() {
        *w = load_word(code, i);
    }
    words
}

/// Bit iterator over bytes (LSB first).
pub struct BitIterator<'a> {
    data: &'a [u8],
    byte_idx: usize,
    bit_idx: u8,
}

impl<'a> BitIterator<'a> {
    /// Create a new bit iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_idx: 0,
            bit_idx: 0,
        }
    }
}

impl<'a> Iterator for BitIterator<'a> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.byte_idx >= self.data.len() {
            return None;
        }

        let bit = (self.data[self.byte_idx] >> self.bit_idx) & 1 == 1;

        self.bit_idx += 1;
        if self.bit_idx >= 8 {
            self.bit_idx = 0;
            self.byte_idx += 1;
        }

        Some(bit)
    }
}

/// Pack boolean values into bytes (LSB first).
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let num_bytes = (bits.len() + 7) / 8;
    let mut result = vec![0u8; num_bytes];

    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            result[i / 8] |= 1 << (i % 8);
        }
    }

    result
}

/// Build a code of `code_size` bytes with the given bit positions set.
///
/// Positions outside the code are ignored.
pub fn code_from_positions(code_size: usize, positions: &[usize]) -> Vec<u8> {
    let mut code = vec![0u8; code_size];
    for &pos in positions {
        if pos < code_size * 8 {
            code[pos / 8] |= 1 << (pos % 8);
        }
    }
    code
}
