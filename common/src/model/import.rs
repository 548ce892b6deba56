use crate::model::mapping::FieldMapping;
use crate::model::row::Row;
use serde::{Deserialize, Serialize};

/// Result of the detection phase: what the file looks like and which columns
/// were guessed for each canonical field. Nothing is persisted when producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Column names in first-occurrence order.
    pub columns: Vec<String>,
    pub mapping: FieldMapping,
    /// The first few data rows, for the caller to confirm the mapping against.
    pub sample_rows: Vec<Row>,
}

/// A rejected row. `row` is the 1-based position of the row in the file,
/// header excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    pub row: usize,
    pub message: String,
}

/// Outcome of a committed import.
///
/// `imported_count + skipped_count` always equals the number of data rows in
/// the file; every skipped row has exactly one entry in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<ImportError>,
}
