//! Segment storage: append-only data files indexed by a serialized trie.
//!
//! Segment `name` in a directory consists of two files:
//!
//! - `b{name}`: the concatenated block bytes,
//! - `h{name}`: the [codec](crate::codec)-encoded index from key digest to
//!   block [`Locator`](crate::Locator).
//!
//! Logical keys are hashed into 32-byte digests by a [`KeyHasher`] before
//! they reach the index.

mod cache;
mod hasher;
mod resolver;
mod segment;

use std::path::{Path, PathBuf};

pub use cache::SegmentCache;
pub use hasher::{KeyHasher, Sha256Hasher};
pub use resolver::{LocatorResolver, MmapResolver};
pub use segment::{Segment, SegmentWriter};

/// Path of the data file of segment `name`.
pub fn data_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("b{name}"))
}

/// Path of the index file of segment `name`.
pub fn index_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("h{name}"))
}
