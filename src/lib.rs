//! inventory-ingest - CSV batch loader for a SQLite inventory database
//!
//! Scans a datasets directory for CSV files, parses each into an in-memory
//! table and writes it to the destination store under the file's base name,
//! replacing any existing table. Progress, per-file failures and total
//! elapsed time go to an append-only log file.

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod store;
pub mod table;

pub use config::{LoaderConfig, LogConfig};
pub use error::{IngestError, Result, StorageErrorKind};
pub use loader::BatchLoader;
pub use store::{SqliteStore, TableStore};
pub use table::{CellValue, ColumnType, Table};
