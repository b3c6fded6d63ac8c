//! Core traits for cloud storage clients.
//!
//! These traits provide synchronous interfaces for the two remote media a transfer can touch:
//! object storage and relational tables. Implementations that talk to async SDKs block
//! internally.

use std::error::Error;
use std::fmt;

// ============================================================================
// Core Error Type
// ============================================================================

/// Generic error type for cloud client operations
#[derive(Debug, Clone)]
pub struct CloudIOError {
    pub message: String,
    pub kind: ErrorKind,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    NotFound,
    InvalidInput,
    Network,
    Timeout,
    Other,
}

impl fmt::Display for CloudIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CloudIOError {}

impl CloudIOError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

pub type CloudResult<T> = Result<T, CloudIOError>;

// ============================================================================
// Credential and Configuration Traits
// ============================================================================

/// Trait for cloud service credentials
pub trait CloudCredentials: Send + Sync {
    /// Returns a unique identifier for this credential (e.g., access key ID)
    fn identifier(&self) -> &str;

    /// Returns the credential type (e.g., `"access_key"`)
    fn credential_type(&self) -> &str;

    /// Validates the credentials (returns Ok if valid)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are invalid, expired, or cannot be validated
    fn validate(&self) -> CloudResult<()>;
}

/// Trait for cloud service configuration
pub trait CloudConfig: Send + Sync {
    /// Returns the region or location for the service
    fn region(&self) -> Option<&str> {
        None
    }

    /// Returns the endpoint URL (if a custom endpoint is used)
    fn endpoint(&self) -> Option<&str> {
        None
    }

    /// Returns the timeout in seconds for a single request
    fn timeout_secs(&self) -> u64 {
        30
    }
}

// ============================================================================
// ObjectIO - Object Storage
// ============================================================================

/// Trait for object storage operations
pub trait ObjectIO: Send + Sync {
    /// Upload data to object storage, replacing any existing object
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket doesn't exist, permissions are not enough, or the upload fails
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()>;

    /// Download data from object storage
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist, permissions are not enough, or the download fails
    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>>;

    /// Check if an object exists
    ///
    /// # Errors
    ///
    /// Returns an error if permissions are not enough or the check fails
    fn object_exists(&self, bucket: &str, key: &str) -> CloudResult<bool>;
}

// ============================================================================
// TableIO - Relational Tables
// ============================================================================

/// Trait for bulk table exchange in the shape of `COPY ... WITH CSV HEADER`.
///
/// Payloads are CSV documents whose first line names the table's columns.
pub trait TableIO: Send + Sync {
    /// Export every row of `schema.table` as CSV with a header line
    ///
    /// # Errors
    ///
    /// Returns an error if the table doesn't exist or there's a connection issue
    fn copy_out(&self, schema: &str, table: &str) -> CloudResult<Vec<u8>>;

    /// Append the rows of a CSV document to `schema.table`, returning the row count
    ///
    /// # Errors
    ///
    /// Returns an error if the table doesn't exist, the header doesn't match its columns,
    /// or there's a connection issue
    fn copy_in(&self, schema: &str, table: &str, payload: &[u8]) -> CloudResult<u64>;

    /// Remove every row of `schema.table`
    ///
    /// # Errors
    ///
    /// Returns an error if the table doesn't exist or there's a connection issue
    fn truncate(&self, schema: &str, table: &str) -> CloudResult<()>;

    /// Replace every row of `schema.table` with the rows of a CSV document
    ///
    /// The default truncates and then copies in. Clients with transactions should override
    /// it so a rejected payload leaves the existing rows in place.
    ///
    /// # Errors
    ///
    /// Same as [`copy_in`](TableIO::copy_in)
    fn replace(&self, schema: &str, table: &str, payload: &[u8]) -> CloudResult<u64> {
        self.truncate(schema, table)?;
        self.copy_in(schema, table, payload)
    }
}
