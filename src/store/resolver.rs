use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::StoreError;
use crate::locator::Locator;

/// Random-access reads of the byte ranges a locator points at.
pub trait LocatorResolver: Send + Sync {
    /// Bytes covered by `locator`. Ranges reaching past the end of the data
    /// are an error.
    fn read(&self, locator: Locator) -> Result<&[u8], StoreError>;
}

fn slice(data: &[u8], locator: Locator) -> Result<&[u8], StoreError> {
    let out_of_bounds = || StoreError::OutOfBounds {
        position: locator.position,
        length: locator.length,
        size: data.len(),
    };
    let end = locator.end().ok_or_else(out_of_bounds)?;
    let start = usize::try_from(locator.position).map_err(|_| out_of_bounds())?;
    let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
    data.get(start..end).ok_or_else(out_of_bounds)
}

impl LocatorResolver for Vec<u8> {
    fn read(&self, locator: Locator) -> Result<&[u8], StoreError> {
        slice(self, locator)
    }
}

/// Read-only memory mapping of a segment data file.
#[derive(Debug)]
pub struct MmapResolver {
    // Zero-length files cannot be mapped.
    map: Option<Mmap>,
}

impl MmapResolver {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self { map: None });
        }
        // SAFETY: segment data files are written once by `SegmentWriter` and
        // never modified afterwards.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self { map: Some(map) })
    }

    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or_default()
    }
}

impl LocatorResolver for MmapResolver {
    fn read(&self, locator: Locator) -> Result<&[u8], StoreError> {
        slice(self.bytes(), locator)
    }
}
