//! # blockidx
//!
//! A byte-prefix radix tree that maps content digests to block
//! [`Locator`]s, plus the compressed on-disk index format and a small
//! segment store built on top of it.
//!
//! Nodes hold edge labels of up to 32 bytes. Child sets start out as short
//! unordered lists and switch to byte-indexed arrays once they fill up.
//! Deletions compact the tree back so that no valueless node is left with a
//! single mergeable child.
//!
//! ## Example
//!
//! ```rust
//! use blockidx::{Locator, Trie};
//!
//! let mut index = Trie::new();
//! index.insert(&[7u8; 32], Locator::new(0, 512)).unwrap();
//! index.insert(&[9u8; 32], Locator::new(512, 64)).unwrap();
//!
//! assert_eq!(index.get(&[7u8; 32]).unwrap(), Some(&Locator::new(0, 512)));
//! assert_eq!(index.size(), 2);
//!
//! let bytes = index.marshal().unwrap();
//! let restored = Trie::unmarshal(&bytes).unwrap();
//! assert_eq!(restored.entries(), index.entries());
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod children;
mod tracing_helpers;

pub mod codec;
pub mod config;
pub mod error;
pub mod locator;
pub mod store;
pub mod trie;

pub use codec::{marshal, unmarshal, Codec};
pub use config::{CodecConfig, TrieConfig};
pub use error::{CodecError, StoreError, TrieError};
pub use locator::{Locator, KEY_LEN, RECORD_LEN};
pub use store::{KeyHasher, LocatorResolver, Segment, SegmentCache, SegmentWriter, Sha256Hasher};
pub use trie::{Trie, Visit};

#[cfg(test)]
mod proptests;
