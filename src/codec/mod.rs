//! Conversion between stored bytes and a [`Dataset`].
//!
//! Each [`Format`] has one [`Codec`]. Codecs know nothing about where bytes come from; the
//! storage layer knows nothing about what they mean.
//!
//! ```
//! use table_transfer::codec::{codec_for, CodecOptions};
//! use table_transfer::Format;
//!
//! # fn main() -> table_transfer::Result<()> {
//! let options = CodecOptions::default();
//! let dataset = codec_for(Format::Csv, &options).decode(b"id,name\n1,alice\n2,bob\n")?;
//! let json = codec_for(Format::Json, &options).encode(&dataset)?;
//! assert_eq!(json, br#"[{"id":1,"name":"alice"},{"id":2,"name":"bob"}]"#);
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod json;
pub mod jsonl;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::Format;
use serde::{Deserialize, Serialize};

pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;
pub use self::jsonl::JsonLinesCodec;

/// Decodes bytes into a dataset and encodes a dataset back into bytes.
pub trait Codec {
    fn format(&self) -> Format;

    /// # Errors
    ///
    /// Returns `MalformedInput` if the payload is not valid for this format or its records
    /// do not share one set of columns.
    fn decode(&self, bytes: &[u8]) -> Result<Dataset>;

    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the records do not share one set of columns.
    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>>;
}

/// Knobs shared by all codecs. Each codec reads only the fields it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Field separator for CSV.
    pub delimiter: u8,
    /// Indent JSON output by two spaces instead of writing it compactly.
    pub pretty_json: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            pretty_json: false,
        }
    }
}

#[must_use]
pub fn codec_for(format: Format, options: &CodecOptions) -> Box<dyn Codec> {
    match format {
        Format::Csv => Box::new(CsvCodec::new(options.delimiter)),
        Format::Json => Box::new(JsonCodec::new(options.pretty_json)),
        Format::JsonLines => Box::new(JsonLinesCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_for_picks_matching_format() {
        let options = CodecOptions::default();
        for format in [Format::Csv, Format::Json, Format::JsonLines] {
            assert_eq!(codec_for(format, &options).format(), format);
        }
    }
}
