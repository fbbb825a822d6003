use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{data_path, index_path, KeyHasher, LocatorResolver, MmapResolver};
use crate::codec;
use crate::error::StoreError;
use crate::locator::{Locator, KEY_LEN};
use crate::tracing_helpers::debug_log;
use crate::trie::Trie;

/// An immutable data file together with the index of its blocks.
pub struct Segment {
    name: String,
    data: Box<dyn LocatorResolver>,
    index: Trie<Locator>,
}

impl Segment {
    pub fn new(name: impl Into<String>, data: impl LocatorResolver + 'static, index: Trie<Locator>) -> Self {
        Self {
            name: name.into(),
            data: Box::new(data),
            index,
        }
    }

    /// Maps the data file and decodes the index file of segment `name` in
    /// `dir`.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let data = MmapResolver::open(data_path(dir, name))?;
        let index = codec::read_file(index_path(dir, name))?;
        debug_log!(segment = name, bytes = data.len(), "opened segment");
        Ok(Self::new(name, data, index))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &Trie<Locator> {
        &self.index
    }

    /// Block stored under the logical `key`, hashed with `hasher`.
    pub fn get<H>(&self, hasher: &H, key: &[u8]) -> Result<Option<&[u8]>, StoreError>
    where
        H: KeyHasher + ?Sized,
    {
        self.get_digest(&hasher.digest(key))
    }

    /// Block stored under an already hashed key.
    pub fn get_digest(&self, digest: &[u8; KEY_LEN]) -> Result<Option<&[u8]>, StoreError> {
        match self.index.get(digest)? {
            Some(&locator) => self.data.read(locator).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Builds a new segment by appending blocks to its data file.
///
/// Nothing is readable until [`finish`](SegmentWriter::finish) writes the
/// index.
pub struct SegmentWriter {
    dir: PathBuf,
    name: String,
    data: BufWriter<File>,
    offset: u64,
    index: Trie<Locator>,
    // Set once a data write fails; the file length no longer matches `offset`.
    failed: bool,
}

impl SegmentWriter {
    /// Creates (or truncates) the data file of segment `name` in `dir`.
    pub fn create(dir: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let name = name.into();
        let file = File::create(data_path(&dir, &name))?;
        Ok(Self {
            dir,
            name,
            data: BufWriter::new(file),
            offset: 0,
            index: Trie::new(),
            failed: false,
        })
    }

    /// Appends `bytes` as the block for `key`. Appending the same key again
    /// points the index at the newer copy.
    ///
    /// A failed write may leave part of `bytes` in the data file, so after an
    /// I/O error every further `append` and [`finish`](Self::finish) fails
    /// with [`StoreError::WriterFailed`].
    pub fn append<H>(&mut self, hasher: &H, key: &[u8], bytes: &[u8]) -> Result<Locator, StoreError>
    where
        H: KeyHasher + ?Sized,
    {
        self.check_usable()?;
        let digest = hasher.digest(key);
        if let Err(err) = self.data.write_all(bytes) {
            self.failed = true;
            return Err(err.into());
        }

        let locator = Locator::new(self.offset, bytes.len() as u64);
        self.offset += locator.length;
        self.index.set(&digest, locator)?;
        Ok(locator)
    }

    /// Flushes the data file, writes the index file and opens the finished
    /// segment for reading.
    pub fn finish(self) -> Result<Segment, StoreError> {
        self.check_usable()?;
        let file = self.data.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        codec::write_file(index_path(&self.dir, &self.name), &self.index)?;
        debug_log!(segment = %self.name, bytes = self.offset, "finished segment");
        Segment::open(&self.dir, &self.name)
    }

    fn check_usable(&self) -> Result<(), StoreError> {
        if self.failed {
            return Err(StoreError::WriterFailed {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Sha256Hasher;

    #[test]
    fn test_in_memory_segment() {
        let hasher = Sha256Hasher;
        let mut index = Trie::new();
        index.insert(&hasher.digest(b"one"), Locator::new(0, 3)).unwrap();
        index.insert(&hasher.digest(b"two"), Locator::new(3, 3)).unwrap();
        let seg = Segment::new("mem", b"onetwo".to_vec(), index);

        assert_eq!(seg.name(), "mem");
        assert_eq!(seg.get(&hasher, b"one").unwrap(), Some(&b"one"[..]));
        assert_eq!(seg.get(&hasher, b"two").unwrap(), Some(&b"two"[..]));
        assert_eq!(seg.get(&hasher, b"three").unwrap(), None);
    }

    #[test]
    fn test_bad_locator_is_an_error() {
        let hasher = Sha256Hasher;
        let mut index = Trie::new();
        index.insert(&hasher.digest(b"k"), Locator::new(4, 10)).unwrap();
        let seg = Segment::new("short", vec![0u8; 8], index);
        assert!(matches!(seg.get(&hasher, b"k"), Err(StoreError::OutOfBounds { .. })));
    }

    #[test]
    fn test_writer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let hasher = Sha256Hasher;

        let mut writer = SegmentWriter::create(dir.path(), "7").unwrap();
        let a = writer.append(&hasher, b"alpha", b"AAAA").unwrap();
        let b = writer.append(&hasher, b"beta", b"BB").unwrap();
        assert_eq!(a, Locator::new(0, 4));
        assert_eq!(b, Locator::new(4, 2));
        // Rewriting a key keeps the old bytes but moves the locator.
        writer.append(&hasher, b"alpha", b"aa").unwrap();

        let seg = writer.finish().unwrap();
        assert!(dir.path().join("b7").exists());
        assert!(dir.path().join("h7").exists());
        assert_eq!(seg.index().size(), 2);
        assert_eq!(seg.get(&hasher, b"alpha").unwrap(), Some(&b"aa"[..]));
        assert_eq!(seg.get(&hasher, b"beta").unwrap(), Some(&b"BB"[..]));
    }

    #[test]
    fn test_failed_write_stops_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readonly");
        std::fs::write(&path, b"").unwrap();

        // A read-only handle rejects every write that reaches the file.
        let mut writer = SegmentWriter {
            dir: dir.path().to_path_buf(),
            name: "ro".to_string(),
            data: BufWriter::new(File::open(&path).unwrap()),
            offset: 0,
            index: Trie::new(),
            failed: false,
        };
        // Larger than the write buffer, so it goes straight to the file.
        let big = vec![0u8; 64 * 1024];
        assert!(matches!(writer.append(&Sha256Hasher, b"big", &big), Err(StoreError::Io(_))));

        let next = writer.append(&Sha256Hasher, b"small", b"x");
        assert!(matches!(next, Err(StoreError::WriterFailed { .. })));
        assert!(writer.index.is_empty());
        assert!(matches!(writer.finish(), Err(StoreError::WriterFailed { .. })));
    }

    #[test]
    fn test_empty_segment() {
        let dir = tempfile::tempdir().unwrap();
        let seg = SegmentWriter::create(dir.path(), "0").unwrap().finish().unwrap();
        assert!(seg.index().is_empty());
        assert_eq!(seg.get(&Sha256Hasher, b"anything").unwrap(), None);
    }

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Segment::open(dir.path(), "nope"), Err(StoreError::Io(_))));
    }
}
