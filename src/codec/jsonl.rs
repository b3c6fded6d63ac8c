//! Newline-delimited JSON: one object per line, blank lines ignored.

use crate::codec::Codec;
use crate::dataset::{Dataset, same_keys};
use crate::error::{Result, TransferError};
use crate::format::Format;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesCodec;

impl Codec for JsonLinesCodec {
    fn format(&self) -> Format {
        Format::JsonLines
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut records = Vec::new();
        for (i, line) in bytes.split(|b| *b == b'\n').enumerate() {
            if line.trim_ascii().is_empty() {
                continue;
            }
            let line_no = i + 1;
            let value: Value = serde_json::from_slice(line).map_err(|e| {
                TransferError::malformed(format!("parse JSONL line {line_no}"))
                    .with_source(e.to_string())
            })?;
            let Value::Object(record) = value else {
                return Err(TransferError::malformed(format!(
                    "JSONL line {line_no} is not an object"
                )));
            };
            if let Some(first) = records.first()
                && !same_keys(first, &record)
            {
                return Err(TransferError::malformed(format!(
                    "JSONL line {line_no} has different columns than the first record"
                )));
            }
            records.push(record);
        }
        log::debug!("Decoded {} JSONL records", records.len());
        Ok(Dataset::from_records_unchecked(records))
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        dataset.ensure_uniform()?;
        let mut out = Vec::new();
        for (i, record) in dataset.iter().enumerate() {
            serde_json::to_writer(&mut out, record).map_err(|e| {
                TransferError::io(format!("serialize record #{i}")).with_source(e.to_string())
            })?;
            out.push(b'\n');
        }
        Ok(out)
    }
}
