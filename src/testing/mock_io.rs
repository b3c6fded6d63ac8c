//! Temporary directories and fixture files for filesystem-backed tests.

use crate::codec::{CodecOptions, codec_for};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::Format;
use crate::io::StorageBackend;
use crate::io::local::LocalStorage;
use crate::location::Location;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory that is automatically deleted when dropped.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// Create a new temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }

    /// A local [`Location`] for `filename` inside this directory.
    ///
    /// # Panics
    ///
    /// Panics if `filename` is empty.
    #[must_use]
    pub fn location(&self, filename: &str) -> Location {
        Location::local(self.file_path(filename)).expect("non-empty fixture path")
    }
}

impl Default for TempDirPath {
    fn default() -> Self {
        Self::new().expect("Failed to create temporary directory")
    }
}

/// Write `contents` to `dir/name`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Decode a plain (uncompressed) file written by a test.
///
/// # Errors
///
/// Returns the storage or codec error.
pub fn read_dataset(path: &Path, format: Format) -> Result<Dataset> {
    let bytes = LocalStorage::new().read(&Location::local(path)?)?;
    codec_for(format, &CodecOptions::default()).decode(&bytes)
}
