//! Local filesystem backend.

use crate::error::{Result, TransferError};
use crate::io::StorageBackend;
use crate::location::Location;
use std::fs::{self, create_dir_all};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes files, resolving relative paths against an optional root directory.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    root: Option<PathBuf>,
}

impl LocalStorage {
    /// Relative paths resolve against the process working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths resolve against `root`. Absolute paths are used as given.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn local_path<'a>(location: &'a Location) -> Result<&'a Path> {
        location.local_path().ok_or_else(|| {
            TransferError::not_implemented(format!(
                "local storage cannot handle {} location {location}",
                location.medium()
            ))
        })
    }
}

fn io_error(err: &std::io::Error, action: &str, path: &Path) -> TransferError {
    let message = format!("{action} {}", path.display());
    let mapped = match err.kind() {
        IoErrorKind::NotFound => TransferError::not_found(message),
        IoErrorKind::PermissionDenied => TransferError::access_denied(message),
        _ => TransferError::io(message),
    };
    mapped.with_source(err.to_string())
}

impl StorageBackend for LocalStorage {
    fn read(&self, location: &Location) -> Result<Vec<u8>> {
        let path = self.resolve(Self::local_path(location)?);
        let bytes = fs::read(&path).map_err(|e| io_error(&e, "read", &path))?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    fn write(&self, location: &Location, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(Self::local_path(location)?);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).map_err(|e| io_error(&e, "mkdir -p", parent))?;
        }
        fs::write(&path, bytes).map_err(|e| io_error(&e, "write", &path))?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
