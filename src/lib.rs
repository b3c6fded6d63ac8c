//! # table-transfer
//!
//! Move a small table between storage media and serialization formats, holding it entirely in
//! memory on the way through.
//!
//! A [`TableTransfer`] ingests a dataset from one [`Location`] in one [`Format`] and emits it
//! to any number of other locations and formats. Storage and format are independent: any
//! backend can carry any format, except relational tables, which only speak CSV.
//!
//! ## Key Features
//!
//! - **Media** - local files, S3-compatible object storage (feature `s3`), and relational
//!   tables through a `COPY`-style client interface
//! - **Formats** - CSV with numeric type inference, JSON arrays, and JSON Lines
//! - **Compression** - `.gz`, `.zst`, `.bz2` and `.xz` suffixes are handled transparently
//!   (optional via feature flags)
//! - **Testable** - every remote client is a trait with an in-memory fake
//!
//! ## Quick Start
//!
//! ```
//! use table_transfer::{Format, Location, TableTransfer};
//! use table_transfer::io::cloud::FakeObjectIO;
//! use table_transfer::io::Storage;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! std::fs::write(dir.path().join("people.csv"), "id,name\n1,alice\n2,bob\n")?;
//!
//! let storage = Storage::local()
//!     .with_root(dir.path())
//!     .with_object_store(Arc::new(FakeObjectIO::new()));
//! let mut transfer = TableTransfer::new(storage);
//!
//! transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
//! transfer.emit(&Location::parse("s3://reports/people.json")?, Format::Json)?;
//! transfer.emit(&Location::parse("people.jsonl")?, Format::JsonLines)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`], whose error is a [`TransferError`] tagged with an
//! [`ErrorKind`]: `NotFound`, `AccessDenied`, `MalformedInput`, `SchemaMismatch`,
//! `NothingLoaded`, `NotImplemented`, `InvalidInput` or `Io`. Nothing is retried.
//!
//! ## Feature Flags
//!
//! - `compression-gzip`, `compression-zstd`, `compression-bzip2`, `compression-xz`
//! - `s3` - [`S3ObjectIO`](io::cloud::s3::S3ObjectIO) built on `object_store`
//! - `cli` - the `table-transfer` binary

pub mod codec;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod io;
pub mod location;
pub mod testing;
pub mod transfer;

pub use codec::CodecOptions;
pub use dataset::{Dataset, Record};
pub use error::{ErrorKind, Result, TransferError};
pub use format::Format;
pub use io::{Storage, StorageBackend, WriteMode};
pub use location::{Location, Medium};
pub use transfer::{TableTransfer, TransferState};
