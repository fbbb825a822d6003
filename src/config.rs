//! Tuning knobs for tries and the index codec.

use crate::error::TrieError;

/// Longest edge label a single node may carry.
pub const DEFAULT_MAX_PREFIX_LEN: usize = 32;

/// Children a sparse collection holds before it is promoted to a dense one.
pub const DEFAULT_SPARSE_CAPACITY: usize = 32;

/// Default zstd level for serialized indexes.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Shape parameters of a [`Trie`](crate::Trie).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieConfig {
    /// Maximum edge label length per node.
    pub max_prefix_len: usize,
    /// Capacity of a sparse child collection.
    pub sparse_capacity: usize,
}

impl TrieConfig {
    pub(crate) fn validate(self) -> Result<Self, TrieError> {
        if self.max_prefix_len == 0 {
            return Err(TrieError::InvalidConfig("max_prefix_len must be at least 1"));
        }
        if self.sparse_capacity == 0 {
            return Err(TrieError::InvalidConfig("sparse_capacity must be at least 1"));
        }
        Ok(self)
    }
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            max_prefix_len: DEFAULT_MAX_PREFIX_LEN,
            sparse_capacity: DEFAULT_SPARSE_CAPACITY,
        }
    }
}

/// Configuration for [`Codec`](crate::codec::Codec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// zstd compression level used when encoding.
    pub level: i32,
    /// Shape of tries produced when decoding.
    pub trie: TrieConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
            trie: TrieConfig::default(),
        }
    }
}
