//! Block locators and their fixed-width record encoding.

use std::fmt;

/// Length of a trie key in the serialized format.
pub const KEY_LEN: usize = 32;

/// Length of one serialized `(key, locator)` record.
pub const RECORD_LEN: usize = KEY_LEN + 16;

/// Byte range `[position, position + length)` inside an external data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Locator {
    pub position: u64,
    pub length: u64,
}

impl Locator {
    pub const fn new(position: u64, length: u64) -> Self {
        Self { position, length }
    }

    /// One past the last byte, or `None` on overflow.
    pub fn end(self) -> Option<u64> {
        self.position.checked_add(self.length)
    }

    /// Big-endian `position | length`.
    pub(crate) fn to_be_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.position.to_be_bytes());
        out[8..].copy_from_slice(&self.length.to_be_bytes());
        out
    }

    /// Inverse of [`to_be_bytes`](Self::to_be_bytes). `bytes` must be 16
    /// bytes long.
    pub(crate) fn from_be_bytes(bytes: &[u8]) -> Self {
        Self {
            position: read_u64_be(&bytes[..8]),
            length: read_u64_be(&bytes[8..]),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.position, self.length)
    }
}

#[inline]
fn read_u64_be(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

/// Splits a record into key and locator.
///
/// `record` must be exactly [`RECORD_LEN`] bytes long.
pub(crate) fn decode_record(record: &[u8]) -> (&[u8], Locator) {
    debug_assert_eq!(record.len(), RECORD_LEN);
    let (key, tail) = record.split_at(KEY_LEN);
    (key, Locator::from_be_bytes(tail))
}
