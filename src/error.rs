//! Error types.
//!
//! Only recoverable conditions live here. Broken structural invariants
//! (duplicate children, removing a child that is not there) panic instead.

use std::io;

/// Invalid use of the trie API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    #[error("empty key passed to a keyed trie operation")]
    EmptyKey,

    #[error("invalid trie configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failure to encode or decode a serialized index.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serialized index is empty")]
    Empty,

    #[error("zstd compression failed: {0}")]
    Compress(#[source] io::Error),

    #[error("zstd decompression failed: {0}")]
    Decompress(#[source] io::Error),

    /// The decompressed stream ended in the middle of a record.
    #[error("truncated record stream: {len} bytes is not a multiple of {record_len}")]
    Truncated { len: usize, record_len: usize },

    #[error("key of {len} bytes cannot be encoded, expected {expected}")]
    KeyLength { len: usize, expected: usize },

    #[error("index file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Trie(#[from] TrieError),
}

/// Failure in the segment store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("segment I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("segment index is unreadable: {0}")]
    Codec(#[from] CodecError),

    #[error("locator {position}+{length} is outside the {size}-byte data file")]
    OutOfBounds { position: u64, length: u64, size: usize },

    /// An earlier append failed part way, so the data file can no longer be
    /// trusted.
    #[error("segment writer for {name} failed on an earlier write")]
    WriterFailed { name: String },
}

impl From<TrieError> for StoreError {
    fn from(err: TrieError) -> Self {
        StoreError::Codec(CodecError::Trie(err))
    }
}
