//! Read-only memory-mapped input file.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::error::{Error, Result};

/// The whole input file as one addressable byte buffer.
///
/// Zero-length files are not mapped; they behave as an empty buffer.
#[derive(Debug)]
pub struct MappedInput {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl MappedInput {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::FileOpen {
            path: path.clone(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| Error::FileOpen {
                path: path.clone(),
                source,
            })?
            .len();

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and the file is not expected to be
            // modified while a run is in progress.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::BufferMap {
                path: path.clone(),
                source,
            })?;
            Some(mmap)
        };

        debug!(path = %path.display(), bytes = len, "mapped input");
        Ok(Self { path, mmap })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unmaps the file. Nothing may borrow from the buffer past this point,
    /// which the borrow checker enforces by taking `self`.
    pub fn release(self) {
        debug!(path = %self.path.display(), "released input");
        drop(self.mmap);
    }
}
