//! A single JSON array of flat objects.

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::error::{Result, TransferError};
use crate::format::Format;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// `pretty` indents output by two spaces; otherwise it is written compactly.
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            TransferError::malformed(format!(
                "invalid JSON at line {} column {}",
                e.line(),
                e.column()
            ))
            .with_source(e.to_string())
        })?;
        let dataset = Dataset::try_from(value)?;
        log::debug!("Decoded {} JSON records", dataset.len());
        Ok(dataset)
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        dataset.ensure_uniform()?;
        let out = if self.pretty {
            serde_json::to_vec_pretty(dataset)
        } else {
            serde_json::to_vec(dataset)
        };
        out.map_err(|e| TransferError::io("JSON serialization failed").with_source(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn decode_keeps_native_types_and_key_order() {
        let ds = JsonCodec::default()
            .decode(br#"[{"z":"x","a":1.5,"ok":true,"gone":null}]"#)
            .unwrap();
        assert_eq!(ds.columns(), vec!["z", "a", "ok", "gone"]);
        assert_eq!(ds.records()[0]["gone"], Value::Null);
        assert_eq!(ds.records()[0]["ok"], json!(true));
    }

    #[test]
    fn malformed_payloads() {
        let cases: [&[u8]; 5] = [b"", b"{", br#"{"id":1}"#, b"[1]", br#"[{"a":1},{"b":1}]"#];
        for bad in cases {
            let err = JsonCodec::default().decode(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn empty_dataset_is_an_empty_array() {
        assert_eq!(JsonCodec::default().encode(&Dataset::new()).unwrap(), b"[]");
        assert!(JsonCodec::default().decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn pretty_output_uses_two_spaces() {
        let ds = Dataset::try_from(json!([{"id": 1}])).unwrap();
        let out = JsonCodec::new(true).encode(&ds).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n  {\n    \"id\": 1\n  }\n]");
    }
}
