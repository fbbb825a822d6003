use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::{KeyHasher, Segment, Sha256Hasher};
use crate::error::StoreError;
use crate::tracing_helpers::{debug_log, trace_log};

/// Bounded set of open segments, evicting the least recently used.
///
/// Segments are loaded from `dir` on first access and shared as
/// `Arc<Segment>`; an evicted segment stays alive for as long as a caller
/// still holds it.
pub struct SegmentCache<H = Sha256Hasher> {
    dir: PathBuf,
    segments: Mutex<LruCache<String, Arc<Segment>>>,
    hasher: H,
}

impl SegmentCache<Sha256Hasher> {
    pub fn new(capacity: NonZeroUsize, dir: impl Into<PathBuf>) -> Self {
        Self::with_hasher(capacity, dir, Sha256Hasher)
    }
}

impl<H: KeyHasher> SegmentCache<H> {
    pub fn with_hasher(capacity: NonZeroUsize, dir: impl Into<PathBuf>, hasher: H) -> Self {
        Self {
            dir: dir.into(),
            segments: Mutex::new(LruCache::new(capacity)),
            hasher,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Segment `name`, opened from disk if it is not cached.
    pub fn get(&self, name: &str) -> Result<Arc<Segment>, StoreError> {
        if let Some(segment) = self.segments.lock().get(name) {
            trace_log!(segment = name, "segment cache hit");
            return Ok(Arc::clone(segment));
        }

        debug_log!(segment = name, "segment cache miss");
        // Load without holding the lock.
        let loaded = Arc::new(Segment::open(&self.dir, name)?);

        let mut segments = self.segments.lock();
        // Someone else may have loaded it meanwhile.
        if let Some(segment) = segments.get(name) {
            return Ok(Arc::clone(segment));
        }
        segments.put(name.to_owned(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Caches `segment` under its name, returning the one it displaced.
    pub fn insert(&self, segment: Arc<Segment>) -> Option<Arc<Segment>> {
        self.segments.lock().put(segment.name().to_owned(), segment)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Segment>> {
        self.segments.lock().pop(name)
    }

    pub fn clear(&self) {
        self.segments.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.segments.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.lock().is_empty()
    }

    /// Cached segment names, most recently used first.
    pub fn names(&self) -> Vec<String> {
        self.segments.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Copy of the block stored under `key` in segment `name`.
    pub fn lookup(&self, name: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let segment = self.get(name)?;
        let block = segment.get(&self.hasher, key)?;
        Ok(block.map(<[u8]>::to_vec))
    }
}
