//! In-memory table parsed from a source file
//!
//! A `Table` is the transient representation of one CSV file: header-derived
//! column names plus an ordered sequence of rows. Cells are coerced to a
//! small value enum so the store can pick sensible SQL column types.

use crate::error::{IngestError, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// A single coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

/// SQL column affinity inferred for one column across all rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// SQL type name used in CREATE TABLE.
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Widen two column types observed in the same column.
    fn merge(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Real) | (ColumnType::Real, ColumnType::Integer) => {
                ColumnType::Real
            }
            _ => ColumnType::Text,
        }
    }
}

/// In-memory tabular data: named columns and ordered rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Parse a CSV file into a table.
    ///
    /// Any read or decode failure is a parse-tier error; the batch loader
    /// propagates it and aborts the run.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| parse_error(&file_name, &e))?;

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| parse_error(&file_name, &e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(IngestError::Parse {
                file: file_name,
                message: "No columns to parse from file".to_string(),
            });
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| parse_error(&file_name, &e))?;
            let row = (0..columns.len())
                .map(|idx| coerce_cell(record.get(idx).unwrap_or("")))
                .collect();
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Infer one SQL column type per column by widening over all rows.
    /// Columns with no non-null cells default to TEXT.
    pub fn column_types(&self) -> Vec<ColumnType> {
        let mut types: Vec<Option<ColumnType>> = vec![None; self.columns.len()];

        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let observed = match cell {
                    CellValue::Null => continue,
                    CellValue::Boolean(_) | CellValue::Integer(_) => ColumnType::Integer,
                    CellValue::Real(_) => ColumnType::Real,
                    CellValue::Text(_) => ColumnType::Text,
                };
                types[idx] = Some(match types[idx] {
                    Some(current) => current.merge(observed),
                    None => observed,
                });
            }
        }

        types
            .into_iter()
            .map(|t| t.unwrap_or(ColumnType::Text))
            .collect()
    }
}

/// Coerce a raw CSV cell into a typed value.
fn coerce_cell(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Real(f);
        }
    }

    CellValue::Text(trimmed.to_string())
}

fn parse_error(file: &str, err: &dyn std::fmt::Display) -> IngestError {
    IngestError::Parse {
        file: file.to_string(),
        message: err.to_string(),
    }
}
