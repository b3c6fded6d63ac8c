//! Assertion functions for comparing datasets.

use crate::dataset::Dataset;

/// Assert that two datasets hold the same records in the same order.
///
/// Values are compared by column name, so key order inside a record does not matter.
///
/// # Panics
///
/// Panics if the datasets differ in length or in any record.
///
/// # Example
///
/// ```
/// use table_transfer::testing::{assert_datasets_equal, people_dataset};
///
/// assert_datasets_equal(&people_dataset(), &people_dataset());
/// ```
pub fn assert_datasets_equal(actual: &Dataset, expected: &Dataset) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Dataset length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Record mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
    }
}

/// Assert the dataset's columns, in order.
///
/// # Panics
///
/// Panics if the columns differ.
pub fn assert_columns(dataset: &Dataset, expected: &[&str]) {
    assert_eq!(
        dataset.columns(),
        expected,
        "Column mismatch:\n  Expected: {expected:?}\n  Actual: {:?}",
        dataset.columns()
    );
}
