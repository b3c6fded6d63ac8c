//! Where a dataset lives.
//!
//! A [`Location`] names one place on one [`Medium`]. Locations validate their parts when
//! built and never change afterwards. They parse from and render to a URI form:
//!
//! | Medium | Form |
//! |---|---|
//! | local | `people.csv`, `/data/people.csv`, `file:///data/people.csv` |
//! | object storage | `s3://bucket/key` (or `object://bucket/key`) |
//! | table | `pg://schema.table` (or `postgres://schema.table`) |

use crate::error::{Result, TransferError};
use crate::format::Format;
use crate::io::cloud::helpers::{
    parse_resource_uri, validate_identifier, validate_key_path, validate_resource_name,
};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Storage medium tag of a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medium {
    Local,
    ObjectStorage,
    Table,
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::ObjectStorage => "object storage",
            Self::Table => "table",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Local { path: PathBuf },
    Object { bucket: String, key: String },
    Table { schema: String, table: String },
}

impl Location {
    /// A path on the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty path.
    pub fn local(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(TransferError::invalid_input("local path cannot be empty"));
        }
        Ok(Self::Local { path })
    }

    /// An object in a bucket.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the bucket name or key is empty or malformed.
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        validate_resource_name(&bucket)?;
        validate_key_path(&key)?;
        Ok(Self::Object { bucket, key })
    }

    /// A relational table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless both parts are plain SQL identifiers.
    pub fn table(schema: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        let table = table.into();
        validate_identifier(&schema)?;
        validate_identifier(&table)?;
        Ok(Self::Table { schema, table })
    }

    /// Parse the URI forms listed in the module docs. Anything without `://` is a local path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unknown schemes or malformed parts.
    pub fn parse(input: &str) -> Result<Self> {
        if !input.contains("://") {
            return Self::local(input);
        }
        let (scheme, parts) = parse_resource_uri(input)?;
        match scheme.as_str() {
            "file" => Self::local(parts.join("/")),
            "s3" | "object" => {
                let (bucket, key) = parts.split_first().ok_or_else(|| {
                    TransferError::invalid_input(format!("missing bucket in {input}"))
                })?;
                Self::object(bucket.as_str(), key.join("/"))
            }
            "pg" | "postgres" => {
                let [qualified] = parts.as_slice() else {
                    return Err(TransferError::invalid_input(format!(
                        "expected {scheme}://schema.table, got {input}"
                    )));
                };
                let (schema, table) = qualified.split_once('.').ok_or_else(|| {
                    TransferError::invalid_input(format!(
                        "expected {scheme}://schema.table, got {input}"
                    ))
                })?;
                Self::table(schema, table)
            }
            other => Err(TransferError::invalid_input(format!(
                "unsupported location scheme {other:?} in {input}"
            ))),
        }
    }

    #[must_use]
    pub fn medium(&self) -> Medium {
        match self {
            Self::Local { .. } => Medium::Local,
            Self::Object { .. } => Medium::ObjectStorage,
            Self::Table { .. } => Medium::Table,
        }
    }

    /// Bucket name; `None` outside object storage.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Object { bucket, .. } => Some(bucket),
            _ => None,
        }
    }

    /// The path or key within the medium. Tables render as `schema.table`.
    #[must_use]
    pub fn path(&self) -> Cow<'_, str> {
        match self {
            Self::Local { path } => path.to_string_lossy(),
            Self::Object { key, .. } => Cow::Borrowed(key),
            Self::Table { schema, table } => Cow::Owned(format!("{schema}.{table}")),
        }
    }

    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local { path } => Some(path),
            _ => None,
        }
    }

    /// Whether `format` can be exchanged with this location's medium.
    ///
    /// Tables speak CSV only; files and objects take every format.
    #[must_use]
    pub fn supports(&self, format: Format) -> bool {
        match self.medium() {
            Medium::Table => format == Format::Csv,
            Medium::Local | Medium::ObjectStorage => true,
        }
    }
}

impl FromStr for Location {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => write!(f, "{}", path.display()),
            Self::Object { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Table { schema, table } => write!(f, "pg://{schema}.{table}"),
        }
    }
}
