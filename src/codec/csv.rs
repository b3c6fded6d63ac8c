//! Delimited text with a header row.
//!
//! Decoding reads the first row as column names and turns every following row into a record.
//! Fields are strings unless they read unambiguously as a number (see [`infer_scalar`]).
//! Encoding writes the header from the first record's columns, then one row per record.

use crate::codec::Codec;
use crate::dataset::{Dataset, Record};
use crate::error::{Result, TransferError};
use crate::format::Format;
use csv::{ErrorKind as CsvErrorKind, ReaderBuilder, WriterBuilder};
use serde_json::{Number, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct CsvCodec {
    delimiter: u8,
}

impl CsvCodec {
    #[must_use]
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::new(b',')
    }
}

fn decode_error(err: &csv::Error) -> TransferError {
    let message = match err.kind() {
        CsvErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map_or(0, csv::Position::line);
            format!("line {line} has {len} fields, header has {expected_len}")
        }
        CsvErrorKind::Utf8 { pos, .. } => {
            let line = pos.as_ref().map_or(0, csv::Position::line);
            format!("line {line} is not valid UTF-8")
        }
        _ => "unreadable CSV".to_string(),
    };
    TransferError::malformed(message).with_source(err.to_string())
}

impl Codec for CsvCodec {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| decode_error(&e))?
            .iter()
            .map(ToString::to_string)
            .collect();
        if headers.is_empty() {
            return Ok(Dataset::new());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(TransferError::malformed(format!(
                "duplicate column {dup:?} in CSV header"
            )));
        }

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row.map_err(|e| decode_error(&e))?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, field)| (name.clone(), infer_scalar(field)))
                .collect();
            records.push(record);
        }
        log::debug!("Decoded {} CSV records", records.len());
        Ok(Dataset::from_records_unchecked(records))
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        if dataset.is_empty() {
            return Ok(Vec::new());
        }
        dataset.ensure_uniform()?;

        let columns = dataset.columns();
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());
        let write_err =
            |e: csv::Error| TransferError::io("CSV write failed").with_source(e.to_string());

        wtr.write_record(&columns).map_err(write_err)?;
        for record in dataset {
            let row = columns
                .iter()
                .map(|c| record.get(*c).map(render_field).unwrap_or_default());
            wtr.write_record(row).map_err(write_err)?;
        }
        wtr.into_inner()
            .map_err(|e| TransferError::io("CSV flush failed").with_source(e.to_string()))
    }
}

fn render_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

/// Type a CSV field: integer, then float, otherwise the field as a string.
///
/// Only plain decimal notation counts as numeric: no leading `+`, no leading zeros, no
/// `NaN`/`inf`, no surrounding whitespace. Integers outside the 64-bit range stay strings.
///
/// ```
/// use table_transfer::codec::csv::infer_scalar;
/// use serde_json::json;
///
/// assert_eq!(infer_scalar("42"), json!(42));
/// assert_eq!(infer_scalar("3.14"), json!(3.14));
/// assert_eq!(infer_scalar("42a"), json!("42a"));
/// assert_eq!(infer_scalar("007"), json!("007"));
/// ```
#[must_use]
pub fn infer_scalar(field: &str) -> Value {
    match classify(field) {
        Some(Numeric::Integer) => {
            if let Ok(i) = field.parse::<i64>() {
                return Value::from(i);
            }
            if let Ok(u) = field.parse::<u64>() {
                return Value::from(u);
            }
        }
        Some(Numeric::Float) => {
            if let Some(n) = field
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Number::from_f64)
            {
                return Value::Number(n);
            }
        }
        None => {}
    }
    Value::String(field.to_string())
}

enum Numeric {
    Integer,
    Float,
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
fn classify(field: &str) -> Option<Numeric> {
    let bytes = field.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_digits = i - int_start;
    if int_digits == 0 || (int_digits > 1 && bytes[int_start] == b'0') {
        return None;
    }

    let mut is_float = false;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
        is_float = true;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
        is_float = true;
    }

    if i != bytes.len() {
        return None;
    }
    Some(if is_float {
        Numeric::Float
    } else {
        Numeric::Integer
    })
}
