//! Storage backends: moving raw bytes to and from a [`Location`].
//!
//! - [`local`] - The local filesystem
//! - [`storage`] - The composite [`Storage`] used by transfers, plus the object-storage and
//!   table adapters over [`cloud`] clients
//! - [`compression`] - Byte-level compression picked by file extension
//! - [`cloud`] - Provider-agnostic client traits, in-memory fakes and the S3 client
//!
//! Backends have no idea what the bytes mean; decoding is the codec's job.

pub mod cloud;
pub mod compression;
pub mod local;
pub mod storage;

use crate::error::Result;
use crate::location::Location;

pub use local::LocalStorage;
pub use storage::{ObjectStorage, Storage, TableStorage, WriteMode};

/// Reads and writes whole payloads at a location.
///
/// Each call makes a single attempt; failures surface immediately.
pub trait StorageBackend {
    /// # Errors
    ///
    /// `NotFound` if nothing exists at `location`, `AccessDenied` if the caller may not read
    /// it, `NotImplemented` if this backend does not handle the location's medium.
    fn read(&self, location: &Location) -> Result<Vec<u8>>;

    /// Replaces whatever is at `location` with `bytes`.
    ///
    /// # Errors
    ///
    /// `AccessDenied` if the caller may not write there, `NotImplemented` if this backend does
    /// not handle the location's medium, `Io` for any other failure.
    fn write(&self, location: &Location, bytes: &[u8]) -> Result<()>;
}
