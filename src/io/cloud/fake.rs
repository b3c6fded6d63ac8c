//! Fake implementations for testing.
//!
//! These implementations use in-memory data structures to simulate remote storage,
//! making them ideal for unit testing without external dependencies.

use crate::io::cloud::traits::{
    CloudConfig, CloudCredentials, CloudIOError, CloudResult, ErrorKind, ObjectIO, TableIO,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Type aliases for complex nested types
type BucketStorage = Arc<Mutex<HashMap<String, HashMap<String, Vec<u8>>>>>;
type TableMap = Arc<Mutex<HashMap<(String, String), FakeTable>>>;

// ============================================================================
// Fake Credentials and Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct FakeCredentials {
    pub identifier: String,
    pub credential_type: String,
}

impl FakeCredentials {
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            credential_type: "access_key".to_string(),
        }
    }
}

impl CloudCredentials for FakeCredentials {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn credential_type(&self) -> &str {
        &self.credential_type
    }

    fn validate(&self) -> CloudResult<()> {
        if self.identifier.is_empty() {
            return Err(CloudIOError::new(
                ErrorKind::Authentication,
                "Empty identifier",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FakeConfig {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl CloudConfig for FakeConfig {
    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

// ============================================================================
// FakeObjectIO
// ============================================================================

/// In-memory object store.
///
/// Clones share the same buckets, so a test can keep one handle for inspection and hand
/// another to a [`Storage`](crate::io::Storage).
#[derive(Clone)]
pub struct FakeObjectIO {
    storage: BucketStorage,
    credentials: Option<Arc<dyn CloudCredentials>>,
}

impl FakeObjectIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            credentials: None,
        }
    }

    /// Requires every call to pass `credentials.validate()` first.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CloudCredentials>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn authorize(&self) -> CloudResult<()> {
        match &self.credentials {
            Some(credentials) => credentials.validate(),
            None => Ok(()),
        }
    }
}

impl Default for FakeObjectIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectIO for FakeObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        self.authorize()?;
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        self.authorize()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| {
                CloudIOError::new(
                    ErrorKind::NotFound,
                    format!("Object {bucket}/{key} not found"),
                )
            })
    }

    fn object_exists(&self, bucket: &str, key: &str) -> CloudResult<bool> {
        self.authorize()?;
        let storage = self.storage.lock().expect("storage mutex poisoned");
        Ok(storage.get(bucket).is_some_and(|b| b.contains_key(key)))
    }
}

// ============================================================================
// FakeTableIO
// ============================================================================

#[derive(Debug, Clone, Default)]
struct FakeTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// In-memory relational tables speaking CSV with a header line.
#[derive(Clone)]
pub struct FakeTableIO {
    tables: TableMap,
}

impl FakeTableIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Declares an empty table with the given columns.
    ///
    /// # Panics
    ///
    /// Panics if the mutex protecting the tables is poisoned.
    pub fn add_table(&self, schema: &str, table: &str, columns: &[&str]) {
        self.tables.lock().expect("tables mutex poisoned").insert(
            (schema.to_string(), table.to_string()),
            FakeTable {
                columns: columns.iter().map(ToString::to_string).collect(),
                rows: Vec::new(),
            },
        );
    }

    /// Returns a copy of the table's rows, or `None` if the table is unknown.
    ///
    /// # Panics
    ///
    /// Panics if the mutex protecting the tables is poisoned.
    #[must_use]
    pub fn rows(&self, schema: &str, table: &str) -> Option<Vec<Vec<String>>> {
        self.tables
            .lock()
            .expect("tables mutex poisoned")
            .get(&(schema.to_string(), table.to_string()))
            .map(|t| t.rows.clone())
    }
}

impl Default for FakeTableIO {
    fn default() -> Self {
        Self::new()
    }
}

fn table_not_found(schema: &str, table: &str) -> CloudIOError {
    CloudIOError::new(
        ErrorKind::NotFound,
        format!("Table {schema}.{table} not found"),
    )
}

fn invalid_csv(err: &csv::Error) -> CloudIOError {
    CloudIOError::new(ErrorKind::InvalidInput, format!("invalid COPY payload: {err}"))
}

/// Checks the header against the table's columns and parses every row.
///
/// Nothing is applied here, so a bad row leaves the table as it was.
fn parse_payload(
    t: &FakeTable,
    schema: &str,
    table: &str,
    payload: &[u8],
) -> CloudResult<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(payload);
    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| invalid_csv(&e))?
        .iter()
        .map(ToString::to_string)
        .collect();
    if header != t.columns {
        return Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            format!(
                "header {header:?} does not match columns {:?} of {schema}.{table}",
                t.columns
            ),
        ));
    }

    let mut parsed = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| invalid_csv(&e))?;
        parsed.push(rec.iter().map(ToString::to_string).collect());
    }
    Ok(parsed)
}

impl TableIO for FakeTableIO {
    fn copy_out(&self, schema: &str, table: &str) -> CloudResult<Vec<u8>> {
        let tables = self.tables.lock().expect("tables mutex poisoned");
        let t = tables
            .get(&(schema.to_string(), table.to_string()))
            .ok_or_else(|| table_not_found(schema, table))?;

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&t.columns).map_err(|e| invalid_csv(&e))?;
        for row in &t.rows {
            wtr.write_record(row).map_err(|e| invalid_csv(&e))?;
        }
        drop(tables);
        wtr.into_inner()
            .map_err(|e| CloudIOError::new(ErrorKind::Other, e.to_string()))
    }

    fn copy_in(&self, schema: &str, table: &str, payload: &[u8]) -> CloudResult<u64> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        let t = tables
            .get_mut(&(schema.to_string(), table.to_string()))
            .ok_or_else(|| table_not_found(schema, table))?;
        let parsed = parse_payload(t, schema, table, payload)?;
        let count = parsed.len() as u64;
        t.rows.extend(parsed);
        Ok(count)
    }

    fn replace(&self, schema: &str, table: &str, payload: &[u8]) -> CloudResult<u64> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        let t = tables
            .get_mut(&(schema.to_string(), table.to_string()))
            .ok_or_else(|| table_not_found(schema, table))?;
        let parsed = parse_payload(t, schema, table, payload)?;
        let count = parsed.len() as u64;
        t.rows = parsed;
        Ok(count)
    }

    fn truncate(&self, schema: &str, table: &str) -> CloudResult<()> {
        let mut tables = self.tables.lock().expect("tables mutex poisoned");
        let t = tables
            .get_mut(&(schema.to_string(), table.to_string()))
            .ok_or_else(|| table_not_found(schema, table))?;
        t.rows.clear();
        Ok(())
    }
}
