//! Filesystem capability used by the file loader.
//!
//! The loader only needs three operations, so they are behind a narrow trait
//! and the resolution engine can be exercised against an in-memory fake
//! without touching the disk.

use crate::options::TextEncoding;
use senv_core::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Narrow filesystem capability: existence, size, read-as-text.
pub trait FileSystem: Send + Sync {
    /// Whether a regular file exists at the path. Directories do not count.
    fn is_file(&self, path: &Path) -> bool;

    /// Size in bytes of the file at the path.
    fn file_size(&self, path: &Path) -> Result<u64>;

    /// Read the file and decode it with the given encoding.
    fn read_to_string(&self, path: &Path, encoding: TextEncoding) -> Result<String>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = std::fs::metadata(path).map_err(|e| Error::io(path, "metadata", e))?;
        Ok(metadata.len())
    }

    fn read_to_string(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, "read", e))?;
        encoding.decode(path, &bytes)
    }
}

/// In-memory filesystem fake for exercising the loader and resolver without
/// disk I/O. Counts reads so tests can assert on caching behavior.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    reads: AtomicUsize,
}

impl MemoryFileSystem {
    /// Create a new empty fake
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file with the given contents
    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Number of `read_to_string` calls served so far
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        self.files
            .get(path)
            .map(|contents| contents.len() as u64)
            .ok_or_else(|| Error::file_not_found(path))
    }

    fn read_to_string(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| Error::file_not_found(path))?;
        encoding.decode(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fs_tracks_reads() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/secrets/token", "abc");

        assert!(fs.is_file(Path::new("/secrets/token")));
        assert!(!fs.is_file(Path::new("/secrets/other")));
        assert_eq!(fs.file_size(Path::new("/secrets/token")).unwrap(), 3);
        assert_eq!(fs.read_count(), 0);

        let text = fs
            .read_to_string(Path::new("/secrets/token"), TextEncoding::Utf8)
            .unwrap();
        assert_eq!(text, "abc");
        assert_eq!(fs.read_count(), 1);
    }
}
