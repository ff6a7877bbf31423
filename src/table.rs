//! Tabular Log Persistence
//!
//! Writes one record per row to a delimited log file with a header row.
//! Appending unions the existing file's columns with the record's columns
//! (outer join on column names): neither side's columns are dropped and
//! missing cells stay blank. The log is rewritten through a sibling temp
//! file so a failed write never truncates the existing log.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::record::RunRecord;

/// Errors from log persistence
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Render one record value as a CSV cell
///
/// Scalars keep their natural text form; lists and maps are embedded as
/// compact JSON so the cell survives a round trip through the log.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Create `path` containing only this record: a header row plus one data row
pub fn write_row(path: impl AsRef<Path>, record: &RunRecord) -> Result<()> {
    let path = path.as_ref();
    let columns: Vec<String> = record.fields().to_vec();
    let rows = vec![record_cells(record, &columns)];
    write_table(path, &columns, &rows)
}

/// Append the record to an existing log, unioning columns
///
/// Existing columns keep their order; columns only the record carries are
/// appended after them. Prior rows get blank cells for the new columns.
pub fn append_row(path: impl AsRef<Path>, record: &RunRecord) -> Result<()> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for existing in reader.records() {
        let existing = existing?;
        let mut cells: Vec<String> = existing.iter().map(str::to_string).collect();
        cells.resize(columns.len(), String::new());
        rows.push(cells);
    }

    for field in record.fields() {
        if !columns.iter().any(|c| c == field) {
            columns.push(field.clone());
        }
    }
    for row in &mut rows {
        row.resize(columns.len(), String::new());
    }
    rows.push(record_cells(record, &columns));

    write_table(path, &columns, &rows)
}

fn record_cells(record: &RunRecord, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.get(column).map(cell_text).unwrap_or_default())
        .collect()
}

fn write_table(path: &Path, columns: &[String], rows: &[Vec<String>]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
