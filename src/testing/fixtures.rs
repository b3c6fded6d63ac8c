//! Pre-built datasets for common testing scenarios.

use crate::dataset::Dataset;
use serde_json::{Value, json};

/// CSV text for [`people_dataset`].
///
/// ```
/// use table_transfer::testing::people_csv;
///
/// assert!(people_csv().starts_with("id,name,score\n"));
/// ```
#[must_use]
pub fn people_csv() -> &'static str {
    "id,name,score\n1,alice,9.5\n2,bob,7.25\n3,carol,8\n"
}

/// What [`people_csv`] decodes to.
#[must_use]
pub fn people_dataset() -> Dataset {
    dataset_from_json(json!([
        {"id": 1, "name": "alice", "score": 9.5},
        {"id": 2, "name": "bob", "score": 7.25},
        {"id": 3, "name": "carol", "score": 8}
    ]))
}

/// Every scalar kind JSON can carry, including null and a nested value.
///
/// CSV cannot round-trip this one: booleans and nulls come back as strings.
#[must_use]
pub fn mixed_dataset() -> Dataset {
    dataset_from_json(json!([
        {"id": 1, "label": "first", "ratio": 0.5, "active": true, "note": null, "tags": ["a"]},
        {"id": 2, "label": "second", "ratio": -1.25, "active": false, "note": "n", "tags": []}
    ]))
}

/// Build a dataset from a JSON array literal.
///
/// # Panics
///
/// Panics if `value` is not an array of objects sharing one set of keys.
#[must_use]
pub fn dataset_from_json(value: Value) -> Dataset {
    Dataset::try_from(value).expect("fixture must be an array of uniform objects")
}
