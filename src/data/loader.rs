// CSV loader module
// Reads the configured file once at startup into an in-memory dataset

use csv::ReaderBuilder;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

use super::error::LoadError;

/// One parsed CSV row: column name to string value, in file column order.
pub type RowRecord = serde_json::Map<String, Value>;

/// The in-memory dataset: column names plus rows in file order.
///
/// Loaded once at startup and never mutated afterwards; serving works on
/// copies of the stored rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<RowRecord>,
}

impl Dataset {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<RowRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load the CSV file at `path` into a `Dataset`.
///
/// The reader is strict: a row whose field count differs from the header is
/// a parse failure, not a skip. All values are kept as strings; nothing is
/// validated beyond CSV well-formedness.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let file = File::open(path.as_ref())?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::NoRows);
    }
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RowRecord::new();
        for (column, value) in columns.iter().zip(record.iter()) {
            row.insert(column.clone(), Value::String(value.to_string()));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoadError::NoRows);
    }

    Ok(Dataset::new(columns, rows))
}
