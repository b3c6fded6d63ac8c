//! Serialization formats a dataset can be read from or written to.

use crate::error::{Result, TransferError};
use crate::io::compression::strip_compression_extension;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Delimited text with a mandatory header row.
    Csv,
    /// A single JSON array of objects.
    Json,
    /// One JSON object per line.
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl Format {
    /// Infer the format from a path's extension, ignoring a trailing compression suffix.
    ///
    /// Returns `None` when the extension is missing or unknown.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let stripped = strip_compression_extension(path);
        let (_, ext) = stripped.rsplit_once('.')?;
        if ext.contains('/') {
            return None;
        }
        ext.parse().ok()
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        }
    }
}

impl FromStr for Format {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            other => Err(TransferError::invalid_input(format!(
                "unknown format {other:?} (expected csv, json or jsonl)"
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_reads_extension() {
        assert_eq!(Format::from_path("out/people.csv"), Some(Format::Csv));
        assert_eq!(Format::from_path("people.JSON"), Some(Format::Json));
        assert_eq!(Format::from_path("events.ndjson"), Some(Format::JsonLines));
        assert_eq!(Format::from_path("people"), None);
        assert_eq!(Format::from_path("dir.csv/people"), None);
        assert_eq!(Format::from_path("people.parquet"), None);
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn from_path_skips_compression_suffix() {
        assert_eq!(Format::from_path("people.csv.gz"), Some(Format::Csv));
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("JSONL".parse::<Format>().unwrap(), Format::JsonLines);
        assert_eq!(Format::Json.to_string(), "json");
        assert!("xml".parse::<Format>().is_err());
    }
}
