//! The in-memory table held by a transfer.
//!
//! A [`Dataset`] is an ordered list of [`Record`]s. Every record carries the same set of
//! column names; the schema is implicit and comes from the first record. Column order is the
//! order in which keys were first seen, which is what CSV headers are written from.

use crate::error::{Result, TransferError};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// One row: column name to scalar value, in insertion order.
pub type Record = Map<String, Value>;

/// Serializes as a plain array of records. Deserializing goes through
/// [`Dataset::from_records`], so mixed key sets are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Record>")]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset, checking that every record has the first record's columns.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` naming the first offending record.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let dataset = Self { records };
        dataset.ensure_uniform()?;
        Ok(dataset)
    }

    /// Fails `SchemaMismatch` unless every record has the first record's columns.
    pub(crate) fn ensure_uniform(&self) -> Result<()> {
        match self.first_schema_violation() {
            Some(index) => Err(TransferError::schema_mismatch(format!(
                "record {index} has columns {:?}, expected {:?}",
                key_list(&self.records[index]),
                self.columns()
            ))),
            None => Ok(()),
        }
    }

    /// Wraps records without checking their columns.
    ///
    /// Codecs use this once they have checked the key sets themselves. Anything else should
    /// call [`from_records`](Self::from_records).
    #[doc(hidden)]
    #[must_use]
    pub fn from_records_unchecked(records: Vec<Record>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Column names of the first record, in order. Empty for an empty dataset.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Index of the first record whose key set differs from record 0.
    #[must_use]
    pub fn first_schema_violation(&self) -> Option<usize> {
        let (first, rest) = self.records.split_first()?;
        rest.iter()
            .position(|record| !same_keys(first, record))
            .map(|i| i + 1)
    }
}

pub(crate) fn same_keys(a: &Record, b: &Record) -> bool {
    a.len() == b.len() && a.keys().all(|k| b.contains_key(k))
}

fn key_list(record: &Record) -> Vec<&str> {
    record.keys().map(String::as_str).collect()
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl TryFrom<Vec<Record>> for Dataset {
    type Error = TransferError;

    fn try_from(records: Vec<Record>) -> Result<Self> {
        Self::from_records(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl TryFrom<Value> for Dataset {
    type Error = TransferError;

    /// Accepts a JSON array of objects sharing one key set.
    fn try_from(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(TransferError::malformed(
                "expected a top-level array of objects",
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(record) => {
                    if let Some(first) = records.first()
                        && !same_keys(first, &record)
                    {
                        return Err(TransferError::malformed(format!(
                            "record {i} has columns {:?}, expected {:?}",
                            key_list(&record),
                            key_list(first)
                        )));
                    }
                    records.push(record);
                }
                other => {
                    return Err(TransferError::malformed(format!(
                        "element {i} is not an object: {other}"
                    )));
                }
            }
        }
        Ok(Self::from_records_unchecked(records))
    }
}
