//! Destination store
//!
//! The store connection used to be process-wide state created at import
//! time. It is now an explicitly constructed `SqliteStore` passed into the
//! loader at startup. The `TableStore` trait is the seam between the loader
//! and the store, so tests can substitute a failing store.

use crate::error::{IngestError, Result};
use crate::table::{CellValue, Table};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use std::path::Path;

/// Abstract destination for parsed tables.
pub trait TableStore {
    /// Persist `table` under `name`, fully replacing any existing relation
    /// of that name. All-or-nothing per table; no transaction spans tables.
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<()>;
}

/// SQLite-backed store holding one connection for the lifetime of the run.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a file-backed database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| IngestError::storage("<open>", e))?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| IngestError::storage("<open>", e))?;
        Ok(Self { conn })
    }

    /// Number of rows currently in `name`.
    pub fn count_rows(&self, name: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(name));
        self.conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| IngestError::storage(name, e))
    }

    /// Whether a table named `name` exists.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .map_err(|e| IngestError::storage(name, e))?;
        Ok(count > 0)
    }
}

impl TableStore for SqliteStore {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<()> {
        let wrap = |e: rusqlite::Error| IngestError::storage(name, e);

        let tx = self.conn.transaction().map_err(wrap)?;

        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)))
            .map_err(wrap)?;

        let column_decls: Vec<String> = table
            .columns
            .iter()
            .zip(table.column_types())
            .map(|(col, ty)| format!("{} {}", quote_ident(col), ty.sql_name()))
            .collect();
        tx.execute_batch(&format!(
            "CREATE TABLE {} ({})",
            quote_ident(name),
            column_decls.join(", ")
        ))
        .map_err(wrap)?;

        if !table.rows.is_empty() {
            let placeholders: Vec<String> = (1..=table.columns.len())
                .map(|i| format!("?{}", i))
                .collect();
            let insert_sql = format!(
                "INSERT INTO {} VALUES ({})",
                quote_ident(name),
                placeholders.join(", ")
            );

            let mut stmt = tx.prepare(&insert_sql).map_err(wrap)?;
            for row in &table.rows {
                let params = rusqlite::params_from_iter(row.iter().map(cell_to_sql));
                stmt.execute(params).map_err(wrap)?;
            }
            drop(stmt);
        }

        tx.commit().map_err(wrap)
    }
}

/// Quote an identifier for SQLite, escaping embedded double quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite has no boolean affinity; booleans land as 0/1 integers.
fn cell_to_sql(cell: &CellValue) -> SqlValue {
    match cell {
        CellValue::Null => SqlValue::Null,
        CellValue::Boolean(b) => SqlValue::Integer(*b as i64),
        CellValue::Integer(i) => SqlValue::Integer(*i),
        CellValue::Real(f) => SqlValue::Real(*f),
        CellValue::Text(s) => SqlValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table(rows: usize) -> Table {
        Table {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        CellValue::Integer(i as i64),
                        CellValue::Text(format!("item_{}", i)),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn test_replace_creates_table() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.replace_table("orders", &sample_table(3)).unwrap();

        assert!(store.table_exists("orders").unwrap());
        assert_eq!(store.count_rows("orders").unwrap(), 3);
    }

    #[test]
    fn test_replace_drops_prior_contents() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.replace_table("orders", &sample_table(5)).unwrap();
        store.replace_table("orders", &sample_table(2)).unwrap();

        // Replaced, not appended.
        assert_eq!(store.count_rows("orders").unwrap(), 2);
    }

    #[test]
    fn test_replace_handles_empty_table() {
        let mut store = SqliteStore::in_memory().unwrap();
        let table = Table {
            columns: vec!["a".to_string()],
            rows: vec![],
        };
        store.replace_table("empty", &table).unwrap();

        assert!(store.table_exists("empty").unwrap());
        assert_eq!(store.count_rows("empty").unwrap(), 0);
    }

    #[test]
    fn test_identifiers_are_quoted() {
        let mut store = SqliteStore::in_memory().unwrap();
        let table = Table {
            columns: vec!["order id".to_string(), "select".to_string()],
            rows: vec![vec![CellValue::Integer(1), CellValue::Text("x".to_string())]],
        };
        // Space and keyword column names plus a dotted table name must not
        // break the generated SQL.
        store.replace_table("report_2023.data", &table).unwrap();
        assert_eq!(store.count_rows("report_2023.data").unwrap(), 1);
    }

    #[test]
    fn test_null_and_boolean_cells() {
        let mut store = SqliteStore::in_memory().unwrap();
        let table = Table {
            columns: vec!["flag".to_string(), "note".to_string()],
            rows: vec![
                vec![CellValue::Boolean(true), CellValue::Null],
                vec![CellValue::Boolean(false), CellValue::Text("ok".to_string())],
            ],
        };
        store.replace_table("flags", &table).unwrap();
        assert_eq!(store.count_rows("flags").unwrap(), 2);
    }
}
