//! Template Schema Loading
//!
//! Reads the ordered set of field names that defines one run record's shape.
//! The template is a file with a header row; supported formats are delimited
//! text (CSV/TSV) and spreadsheet workbooks (XLSX), dispatched on file
//! extension. An unrecognized extension is fatal at load time; every later
//! lookup against the schema is best-effort.

use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from template loading
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template extension {extension:?} not supported (expected csv, tsv, or xlsx)")]
    UnsupportedExtension { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheets: {0}")]
    EmptyWorkbook(String),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Supported template file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateFormat {
    /// Comma-delimited text
    Csv,
    /// Tab-delimited text
    Tsv,
    /// Excel workbook
    Xlsx,
}

impl TemplateFormat {
    /// Detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(TemplateFormat::Csv),
            "tsv" | "tab" => Some(TemplateFormat::Tsv),
            "xlsx" | "xlsm" | "xls" => Some(TemplateFormat::Xlsx),
            _ => None,
        }
    }

    /// Detect format from a path, failing on unknown or missing extensions
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| TemplateError::UnsupportedExtension {
            extension: ext.to_string(),
        })
    }

    /// Field delimiter for text formats; `None` for workbooks
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            TemplateFormat::Csv => Some(b','),
            TemplateFormat::Tsv => Some(b'\t'),
            TemplateFormat::Xlsx => None,
        }
    }
}

/// Ordered set of field names read from a template header row
///
/// Duplicate names keep their first position; empty header cells are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSchema {
    fields: Vec<String>,
}

impl TemplateSchema {
    /// Read the schema from a template file, dispatching on extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let names = match TemplateFormat::from_path(path)? {
            TemplateFormat::Csv => read_delimited(path, b',')?,
            TemplateFormat::Tsv => read_delimited(path, b'\t')?,
            TemplateFormat::Xlsx => read_workbook(path)?,
        };
        Ok(Self::from_fields(names))
    }

    /// Build a schema from an in-memory field list
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if field.is_empty() || seen.contains(&field) {
                continue;
            }
            seen.push(field);
        }
        Self { fields: seen }
    }

    /// Field names in template order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the schema names this field
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate field names in template order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

fn read_workbook(path: &Path) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TemplateError::EmptyWorkbook(path.display().to_string()))??;
    Ok(range
        .rows()
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default())
}
