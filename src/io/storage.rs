//! The composite backend used by transfers.
//!
//! [`Storage`] always handles the local filesystem. Object storage and tables are opt-in:
//! attach an [`ObjectIO`] or [`TableIO`] client and locations on that medium start working.
//! Until then they fail with `NotImplemented`.
//!
//! Files and objects pass through [`compression`](crate::io::compression): a `.gz`, `.zst`,
//! `.bz2` or `.xz` suffix on the path compresses on write and decompresses on read. Tables
//! exchange plain CSV with a header row, the payload a `COPY schema.table FROM STDIN WITH CSV
//! HEADER` would take.

use crate::error::{Result, TransferError};
use crate::io::StorageBackend;
use crate::io::cloud::{ObjectIO, TableIO};
use crate::io::compression;
use crate::io::local::LocalStorage;
use crate::location::{Location, Medium};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

fn unsupported(location: &Location, backend: &str) -> TransferError {
    TransferError::not_implemented(format!(
        "{backend} cannot handle {} location {location}",
        location.medium()
    ))
}

// ============================================================================
// Object storage
// ============================================================================

/// Adapts an [`ObjectIO`] client to [`StorageBackend`].
#[derive(Clone)]
pub struct ObjectStorage {
    client: Arc<dyn ObjectIO>,
}

impl ObjectStorage {
    pub fn new(client: Arc<dyn ObjectIO>) -> Self {
        Self { client }
    }
}

impl StorageBackend for ObjectStorage {
    fn read(&self, location: &Location) -> Result<Vec<u8>> {
        let Location::Object { bucket, key } = location else {
            return Err(unsupported(location, "object storage"));
        };
        let bytes = self.client.get_object(bucket, key)?;
        log::debug!("Read {} bytes from {location}", bytes.len());
        Ok(bytes)
    }

    fn write(&self, location: &Location, bytes: &[u8]) -> Result<()> {
        let Location::Object { bucket, key } = location else {
            return Err(unsupported(location, "object storage"));
        };
        self.client.put_object(bucket, key, bytes)?;
        log::debug!("Wrote {} bytes to {location}", bytes.len());
        Ok(())
    }
}

// ============================================================================
// Tables
// ============================================================================

/// How rows written to a table combine with the rows already there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Append rows.
    #[default]
    Insert,
    /// Replace the table's rows. A rejected payload leaves them in place when the client
    /// overrides [`TableIO::replace`].
    TruncateInsert,
    /// Insert or update by key. Not supported.
    Upsert,
}

impl FromStr for WriteMode {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "insert" => Ok(Self::Insert),
            "truncate-insert" => Ok(Self::TruncateInsert),
            "upsert" => Ok(Self::Upsert),
            other => Err(TransferError::invalid_input(format!(
                "unknown write mode {other:?}"
            ))),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::TruncateInsert => "truncate-insert",
            Self::Upsert => "upsert",
        })
    }
}

/// Adapts a [`TableIO`] client to [`StorageBackend`] with a fixed [`WriteMode`].
#[derive(Clone)]
pub struct TableStorage {
    client: Arc<dyn TableIO>,
    mode: WriteMode,
}

impl TableStorage {
    pub fn new(client: Arc<dyn TableIO>, mode: WriteMode) -> Self {
        Self { client, mode }
    }

    #[must_use]
    pub fn mode(&self) -> WriteMode {
        self.mode
    }
}

impl StorageBackend for TableStorage {
    fn read(&self, location: &Location) -> Result<Vec<u8>> {
        let Location::Table { schema, table } = location else {
            return Err(unsupported(location, "table storage"));
        };
        let bytes = self.client.copy_out(schema, table)?;
        log::debug!("Copied {} bytes out of {location}", bytes.len());
        Ok(bytes)
    }

    fn write(&self, location: &Location, bytes: &[u8]) -> Result<()> {
        let Location::Table { schema, table } = location else {
            return Err(unsupported(location, "table storage"));
        };
        // An empty dataset encodes to no bytes at all, not even a header.
        let rows = match self.mode {
            WriteMode::Upsert => {
                return Err(TransferError::not_implemented(format!(
                    "upsert into {location} is not supported"
                )));
            }
            WriteMode::TruncateInsert if bytes.is_empty() => {
                self.client.truncate(schema, table)?;
                0
            }
            WriteMode::TruncateInsert => self.client.replace(schema, table, bytes)?,
            WriteMode::Insert if bytes.is_empty() => 0,
            WriteMode::Insert => self.client.copy_in(schema, table, bytes)?,
        };
        log::debug!("Wrote {rows} rows to {location} ({})", self.mode);
        Ok(())
    }
}

// ============================================================================
// Composite
// ============================================================================

/// Dispatches each location to the backend for its medium.
#[derive(Clone, Default)]
pub struct Storage {
    local: LocalStorage,
    object: Option<ObjectStorage>,
    table: Option<TableStorage>,
}

impl Storage {
    /// Local filesystem only, relative to the working directory.
    #[must_use]
    pub fn local() -> Self {
        Self::default()
    }

    /// Resolve relative local paths against `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local = LocalStorage::with_root(root);
        self
    }

    #[must_use]
    pub fn with_object_store(mut self, client: Arc<dyn ObjectIO>) -> Self {
        self.object = Some(ObjectStorage::new(client));
        self
    }

    #[must_use]
    pub fn with_table_store(mut self, client: Arc<dyn TableIO>, mode: WriteMode) -> Self {
        self.table = Some(TableStorage::new(client, mode));
        self
    }

    #[must_use]
    pub fn supports_medium(&self, medium: Medium) -> bool {
        match medium {
            Medium::Local => true,
            Medium::ObjectStorage => self.object.is_some(),
            Medium::Table => self.table.is_some(),
        }
    }

    fn backend(&self, location: &Location) -> Result<&dyn StorageBackend> {
        let backend: Option<&dyn StorageBackend> = match location.medium() {
            Medium::Local => Some(&self.local),
            Medium::ObjectStorage => self.object.as_ref().map(|b| b as &dyn StorageBackend),
            Medium::Table => self.table.as_ref().map(|b| b as &dyn StorageBackend),
        };
        backend.ok_or_else(|| {
            TransferError::not_implemented(format!(
                "no {} backend configured for {location}",
                location.medium()
            ))
        })
    }
}

impl StorageBackend for Storage {
    fn read(&self, location: &Location) -> Result<Vec<u8>> {
        let bytes = self.backend(location)?.read(location)?;
        match location.medium() {
            Medium::Table => Ok(bytes),
            Medium::Local | Medium::ObjectStorage => {
                compression::decompress(bytes, &location.path())
            }
        }
    }

    fn write(&self, location: &Location, bytes: &[u8]) -> Result<()> {
        let backend = self.backend(location)?;
        match location.medium() {
            Medium::Table => backend.write(location, bytes),
            Medium::Local | Medium::ObjectStorage => {
                let stored = compression::compress(bytes.to_vec(), &location.path())?;
                backend.write(location, &stored)
            }
        }
    }
}
