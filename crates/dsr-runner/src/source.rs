//! Record sources
//!
//! Spreadsheets are exported to JSON (an array of row objects) before a run;
//! parsing workbook formats is left to whatever tool produced the export.

use dsr_core::{DsrError, Record, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ordered supply of input records
pub trait RecordSource {
    fn records(&self) -> Result<Vec<Record>>;
}

impl RecordSource for Vec<Record> {
    fn records(&self) -> Result<Vec<Record>> {
        Ok(self.clone())
    }
}

/// Records from a JSON array of row objects
///
/// Cell values are stringified the way a spreadsheet would display them:
/// `null` becomes `""`, numbers and booleans their literal text.
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from JSON text
    pub fn parse(content: &str) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Array(rows) = value else {
            return Err(DsrError::RecordSource(
                "expected a JSON array of row objects".to_string(),
            ));
        };

        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| match row {
                Value::Object(cells) => Ok(cells
                    .into_iter()
                    .map(|(column, cell)| (column, cell_text(cell)))
                    .collect()),
                other => Err(DsrError::RecordSource(format!(
                    "row {} is not an object: {}",
                    idx + 1,
                    other
                ))),
            })
            .collect()
    }
}

impl RecordSource for JsonRecordSource {
    fn records(&self) -> Result<Vec<Record>> {
        debug!("Reading records from {}", self.path.display());
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DsrError::RecordSource(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let records = Self::parse(&content)?;
        info!("Loaded {} record(s) from {}", records.len(), self.path.display());
        Ok(records)
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
