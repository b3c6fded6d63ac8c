//! Error taxonomy for transfers.
//!
//! Every failure surfaced by [`TableTransfer`](crate::TableTransfer), a storage backend or a
//! codec is a [`TransferError`] tagged with an [`ErrorKind`]. Errors are never retried or
//! recovered locally; they propagate straight to the caller of `ingest`/`emit`.

use crate::io::cloud::traits::{CloudIOError, ErrorKind as CloudErrorKind};
use std::error::Error;
use std::fmt;

/// Category of a [`TransferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source location does not exist.
    NotFound,
    /// Credentials are missing or insufficient for the location.
    AccessDenied,
    /// Decode-time structural problem (bad CSV/JSON, ragged rows, mixed schemas).
    MalformedInput,
    /// Encode-time problem: records do not share the same keys.
    SchemaMismatch,
    /// `emit` was called before anything was ingested.
    NothingLoaded,
    /// The medium/format combination (or write mode) is not supported.
    NotImplemented,
    /// A location, identifier or option is invalid.
    InvalidInput,
    /// Any other storage failure.
    Io,
}

/// Error returned by every fallible operation in this crate.
#[derive(Debug, Clone)]
pub struct TransferError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<String>,
}

pub type Result<T> = std::result::Result<T, TransferError>;

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl Error for TransferError {}

impl TransferError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedInput, message)
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch, message)
    }

    #[must_use]
    pub fn nothing_loaded() -> Self {
        Self::new(
            ErrorKind::NothingLoaded,
            "no dataset loaded, call ingest before emit",
        )
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }
}

impl From<CloudIOError> for TransferError {
    fn from(err: CloudIOError) -> Self {
        let kind = match err.kind {
            CloudErrorKind::NotFound => ErrorKind::NotFound,
            CloudErrorKind::Authentication | CloudErrorKind::Authorization => {
                ErrorKind::AccessDenied
            }
            CloudErrorKind::InvalidInput => ErrorKind::InvalidInput,
            CloudErrorKind::Network | CloudErrorKind::Timeout | CloudErrorKind::Other => {
                ErrorKind::Io
            }
        };
        Self {
            kind,
            message: err.message,
            source: err.source,
        }
    }
}
