//! Word-wise FNV hash used to fingerprint parameter schemas
//!
//! Bytes are packed little-endian into 64-bit words and each word is folded
//! with xor-then-multiply. A trailing partial word is padded with a single
//! `0x01` byte directly after the data, then the total byte length is folded
//! as one extra word. An empty input hashes to the offset basis.

const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

/// Error returned when hashing is misused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("Cannot add data after a result has been obtained")]
    Finalized,
}

#[inline]
const fn fold(hash: u64, word: u64) -> u64 {
    (hash ^ word).wrapping_mul(FNV_PRIME)
}

/// Padding word for a trailing block of `len` bytes (1..=7)
#[inline]
const fn pad(len: usize) -> u64 {
    1u64 << (8 * len)
}

/// Hash a complete buffer in one go (compile-time capable)
///
/// Equal to feeding `data` to a fresh [`StreamingHash`] and finalising it.
pub const fn fnv_hash(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    if data.is_empty() {
        return hash;
    }

    let mut word = 0u64;
    let mut filled = 0;
    let mut i = 0;
    while i < data.len() {
        word |= (data[i] as u64) << (8 * filled);
        filled += 1;
        if filled == 8 {
            hash = fold(hash, word);
            word = 0;
            filled = 0;
        }
        i += 1;
    }

    if filled > 0 {
        hash = fold(hash, word | pad(filled));
    }
    fold(hash, data.len() as u64)
}

/// Incremental version of [`fnv_hash`]
///
/// Data may be added in chunks of any size; the result only depends on the
/// concatenated bytes.
#[derive(Debug, Clone)]
pub struct StreamingHash {
    hash: u64,
    partial: u64,
    partial_len: usize,
    length: u64,
    finalized: bool,
}

impl Default for StreamingHash {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingHash {
    pub const fn new() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
            partial: 0,
            partial_len: 0,
            length: 0,
            finalized: false,
        }
    }

    /// Append bytes to the stream
    pub fn add_data(&mut self, data: &[u8]) -> Result<(), HashError> {
        if self.finalized {
            return Err(HashError::Finalized);
        }
        self.length += data.len() as u64;

        let mut rest = data;

        // Top up a partial word left over from the previous call
        while self.partial_len > 0 {
            let Some((&byte, tail)) = rest.split_first() else {
                return Ok(());
            };
            self.push_byte(byte);
            rest = tail;
        }

        let mut words = rest.chunks_exact(8);
        for chunk in &mut words {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            self.hash = fold(self.hash, u64::from_le_bytes(bytes));
        }

        for &byte in words.remainder() {
            self.push_byte(byte);
        }
        Ok(())
    }

    fn push_byte(&mut self, byte: u8) {
        self.partial |= (byte as u64) << (8 * self.partial_len);
        self.partial_len += 1;
        if self.partial_len == 8 {
            self.hash = fold(self.hash, self.partial);
            self.partial = 0;
            self.partial_len = 0;
        }
    }

    /// Finalise the stream and return the hash
    ///
    /// Finalisation happens once; later calls return the same value.
    pub fn get_hash(&mut self) -> u64 {
        if !self.finalized {
            if self.length > 0 {
                if self.partial_len > 0 {
                    self.hash = fold(self.hash, self.partial | pad(self.partial_len));
                }
                self.hash = fold(self.hash, self.length);
            }
            self.finalized = true;
        }
        self.hash
    }

    /// Whether [`get_hash`](Self::get_hash) has been called since the last reset
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Return to the initial, empty state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
