//! Serialized index format.
//!
//! An index is the in-order sequence of its entries as fixed-width records,
//!
//! ```text
//! key[32] | position: u64 BE | length: u64 BE
//! ```
//!
//! compressed as a single zstd frame. Only tries whose keys are all exactly
//! [`KEY_LEN`] bytes can be encoded.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::locator::{decode_record, Locator, KEY_LEN, RECORD_LEN};
use crate::tracing_helpers::{debug_log, warn_log};
use crate::trie::{Trie, Visit};

/// Encoder and decoder for serialized indexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    /// Serializes `trie`, streaming records into the compressor during a
    /// single walk.
    pub fn encode(&self, trie: &Trie<Locator>) -> Result<Vec<u8>, CodecError> {
        let mut encoder =
            zstd::stream::write::Encoder::new(Vec::new(), self.config.level).map_err(CodecError::Compress)?;

        trie.visit(|key, locator| -> Result<Visit, CodecError> {
            if key.len() != KEY_LEN {
                return Err(CodecError::KeyLength {
                    len: key.len(),
                    expected: KEY_LEN,
                });
            }
            encoder.write_all(key).map_err(CodecError::Compress)?;
            encoder
                .write_all(&locator.to_be_bytes())
                .map_err(CodecError::Compress)?;
            Ok(Visit::Continue)
        })?;

        let out = encoder.finish().map_err(CodecError::Compress)?;
        debug_log!(bytes = out.len(), "encoded index");
        Ok(out)
    }

    /// Rebuilds a trie from its serialized form.
    ///
    /// When a key occurs more than once, the first record wins.
    pub fn decode(&self, data: &[u8]) -> Result<Trie<Locator>, CodecError> {
        if data.is_empty() {
            return Err(CodecError::Empty);
        }
        let raw = zstd::stream::decode_all(data).map_err(CodecError::Decompress)?;
        if raw.len() % RECORD_LEN != 0 {
            return Err(CodecError::Truncated {
                len: raw.len(),
                record_len: RECORD_LEN,
            });
        }

        let mut trie = Trie::with_config(self.config.trie)?;
        let mut duplicates = 0usize;
        for record in raw.chunks_exact(RECORD_LEN) {
            let (key, locator) = decode_record(record);
            if !trie.insert(key, locator)? {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            warn_log!(duplicates, "index contains repeated keys, kept the first of each");
        }
        debug_log!(records = raw.len() / RECORD_LEN, "decoded index");
        Ok(trie)
    }

    /// Reads and decodes an index file.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Trie<Locator>, CodecError> {
        let data = fs::read(path)?;
        self.decode(&data)
    }

    /// Encodes `trie` and writes it to `path`, replacing any existing file.
    pub fn write_file(&self, path: impl AsRef<Path>, trie: &Trie<Locator>) -> Result<(), CodecError> {
        let data = self.encode(trie)?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// [`Codec::encode`] with the default configuration.
pub fn marshal(trie: &Trie<Locator>) -> Result<Vec<u8>, CodecError> {
    Codec::default().encode(trie)
}

/// [`Codec::decode`] with the default configuration.
pub fn unmarshal(data: &[u8]) -> Result<Trie<Locator>, CodecError> {
    Codec::default().decode(data)
}

/// [`Codec::read_file`] with the default configuration.
pub fn read_file(path: impl AsRef<Path>) -> Result<Trie<Locator>, CodecError> {
    Codec::default().read_file(path)
}

/// [`Codec::write_file`] with the default configuration.
pub fn write_file(path: impl AsRef<Path>, trie: &Trie<Locator>) -> Result<(), CodecError> {
    Codec::default().write_file(path, trie)
}

impl Trie<Locator> {
    /// Serializes the trie with the default codec.
    pub fn marshal(&self) -> Result<Vec<u8>, CodecError> {
        marshal(self)
    }

    /// Deserializes a trie with the default codec.
    pub fn unmarshal(data: &[u8]) -> Result<Self, CodecError> {
        unmarshal(data)
    }
}
