//! Struct-of-arrays helpers used to zip per-record columns into records.
//!
//! Documents describe ion lists (and evaluator regions) as one array per
//! attribute. The record count is fixed by a leading column; every other
//! column must carry exactly that many entries.

use crate::errors::EsError;

/// Validates a column against the declared record count and returns its values.
///
/// An absent column is accepted only when no records are declared.
pub fn take_column<T>(
    component: &str,
    attribute: &str,
    column: Option<Vec<T>>,
    count: usize,
) -> Result<Vec<T>, EsError> {
    match column {
        None if count == 0 => Ok(Vec::new()),
        None => {
            tracing::debug!(component, attribute, count, "column missing");
            Err(EsError::column_missing(component, attribute, count))
        }
        Some(values) if values.len() != count => {
            tracing::debug!(
                component,
                attribute,
                expected = count,
                found = values.len(),
                "column length mismatch"
            );
            Err(EsError::column_length(component, attribute, count, values.len()))
        }
        Some(values) => Ok(values),
    }
}

/// Emits a column for export, leaving it out entirely when there are no records.
pub fn export_column<R, T>(records: &[R], get: impl Fn(&R) -> T) -> Option<Vec<T>> {
    if records.is_empty() {
        None
    } else {
        Some(records.iter().map(get).collect())
    }
}
