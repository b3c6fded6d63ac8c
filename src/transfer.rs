//! The transfer facade: ingest once, emit as often as needed.
//!
//! A [`TableTransfer`] is either [`Empty`](TransferState::Empty) or
//! [`Loaded`](TransferState::Loaded). `ingest` reads a location, decodes it and replaces the
//! held dataset; `emit` encodes the held dataset and writes it out without changing state.
//! A failed `ingest` leaves whatever was held before untouched.
//!
//! ```
//! use table_transfer::{Format, Location, TableTransfer, TransferState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! std::fs::write(dir.path().join("people.csv"), "id,name\n1,alice\n2,bob\n")?;
//!
//! let mut transfer = TableTransfer::local().with_root(dir.path());
//! transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
//! assert_eq!(transfer.state(), TransferState::Loaded);
//!
//! transfer.emit(&Location::parse("people.json")?, Format::Json)?;
//! assert_eq!(
//!     std::fs::read_to_string(dir.path().join("people.json"))?,
//!     r#"[{"id":1,"name":"alice"},{"id":2,"name":"bob"}]"#
//! );
//! # Ok(())
//! # }
//! ```

use crate::codec::{CodecOptions, codec_for};
use crate::dataset::Dataset;
use crate::error::{Result, TransferError};
use crate::format::Format;
use crate::io::StorageBackend;
use crate::io::storage::Storage;
use crate::location::{Location, Medium};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Nothing ingested yet, or the dataset was taken or cleared.
    Empty,
    /// A dataset is held and can be emitted.
    Loaded,
}

pub struct TableTransfer<S: StorageBackend = Storage> {
    storage: S,
    options: CodecOptions,
    dataset: Option<Dataset>,
}

impl TableTransfer<Storage> {
    /// A transfer over the local filesystem only.
    #[must_use]
    pub fn local() -> Self {
        Self::new(Storage::local())
    }

    /// Resolve relative local paths against `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage = self.storage.with_root(root);
        self
    }
}

impl<S: StorageBackend> TableTransfer<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            options: CodecOptions::default(),
            dataset: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> TransferState {
        if self.dataset.is_some() {
            TransferState::Loaded
        } else {
            TransferState::Empty
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Read `source`, decode it as `format` and hold the result, replacing any earlier dataset.
    ///
    /// # Errors
    ///
    /// `NotImplemented` if the medium cannot carry `format`, otherwise whatever the backend
    /// (`NotFound`, `AccessDenied`, `Io`) or codec (`MalformedInput`) reports. The held dataset
    /// is unchanged on error.
    pub fn ingest(&mut self, source: &Location, format: Format) -> Result<()> {
        check_combination(source, format)?;
        let bytes = self.storage.read(source)?;
        let dataset = codec_for(format, &self.options_for(source)).decode(&bytes)?;
        log::info!(
            "Ingested {} records from {source} as {format}",
            dataset.len()
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    /// Encode the held dataset as `format` and write it to `target`.
    ///
    /// # Errors
    ///
    /// `NothingLoaded` before a successful `ingest`, `NotImplemented` if the medium cannot
    /// carry `format`, `SchemaMismatch` from the codec, or the backend's write error.
    pub fn emit(&self, target: &Location, format: Format) -> Result<()> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(TransferError::nothing_loaded)?;
        check_combination(target, format)?;
        let bytes = codec_for(format, &self.options_for(target)).encode(dataset)?;
        self.storage.write(target, &bytes)?;
        log::info!(
            "Emitted {} records to {target} as {format}",
            dataset.len()
        );
        Ok(())
    }

    /// Tables always exchange comma-separated CSV, whatever delimiter files use.
    fn options_for(&self, location: &Location) -> CodecOptions {
        match location.medium() {
            Medium::Table => CodecOptions {
                delimiter: b',',
                ..self.options
            },
            Medium::Local | Medium::ObjectStorage => self.options,
        }
    }

    /// Move the held dataset out, leaving the transfer empty.
    pub fn take(&mut self) -> Option<Dataset> {
        self.dataset.take()
    }

    pub fn clear(&mut self) {
        self.dataset = None;
    }
}

fn check_combination(location: &Location, format: Format) -> Result<()> {
    if location.supports(format) {
        return Ok(());
    }
    Err(TransferError::not_implemented(format!(
        "{format} is not supported for {} location {location}",
        location.medium()
    )))
}
