//! Batch Loader
//!
//! One invocation scans the datasets directory, parses each matching CSV
//! file into a `Table` and writes it to the injected store under a name
//! derived from the file name, replacing any prior table of that name.
//!
//! Error handling is deliberately two-tier, matching the historical
//! behavior: a parse failure propagates and aborts the whole run, while a
//! persistence failure is logged and the batch moves on to the next file.

use crate::error::Result;
use crate::store::TableStore;
use crate::table::Table;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Substring that marks a file as tabular input. Matched anywhere in the
/// file name, not just as a suffix, so `archive.csv.bak` is picked up too.
/// Historical loose matching, kept as-is.
const SOURCE_EXT_MARKER: &str = ".csv";

/// Sequential loader over an injected destination store.
pub struct BatchLoader<S: TableStore> {
    store: S,
    datasets_dir: PathBuf,
}

impl<S: TableStore> BatchLoader<S> {
    pub fn new(store: S, datasets_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            datasets_dir: datasets_dir.into(),
        }
    }

    /// Run the full batch once: scan, then parse and ingest each file,
    /// then log completion and total elapsed minutes.
    pub fn run(&mut self) -> Result<()> {
        let started = Instant::now();

        let files = scan_source_files(&self.datasets_dir)?;
        self.run_files(&files)?;

        info!("INGESTION COMPLETE");
        info!(
            "Total Time Taken: {} minutes",
            elapsed_minutes(started.elapsed())
        );
        Ok(())
    }

    /// Process the given files in order.
    ///
    /// Split out from `run` so the ordering is controllable: the directory
    /// scan carries no sort guarantee, and the abort-on-parse-failure
    /// behavior is order-dependent.
    pub fn run_files(&mut self, files: &[PathBuf]) -> Result<()> {
        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            // Parse failures are not caught here; one malformed file aborts
            // the remainder of the batch.
            let table = Table::from_csv_path(path)?;

            info!("Ingesting {} in db", file_name);
            let table_name = derive_table_name(&file_name);
            self.ingest(&table, &table_name);
        }
        Ok(())
    }

    /// Persist one table, replacing any existing table of the same name.
    ///
    /// Never propagates: a storage failure is logged with its detail and
    /// the batch continues with the next file.
    pub fn ingest(&mut self, table: &Table, name: &str) {
        match self.store.replace_table(name, table) {
            Ok(()) => {
                info!(
                    "Successfully ingested data into {} table, replacing existing table if any.",
                    name
                );
            }
            Err(e) => {
                error!("Error during data ingestion into {}: {}", name, e);
            }
        }
    }

    /// Access the store after the run, used by tests and callers that want
    /// to inspect the destination.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// List entries of `dir` whose name contains the tabular extension marker,
/// in the order the directory listing returns them.
pub fn scan_source_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.contains(SOURCE_EXT_MARKER) {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Derive the target table name by stripping the trailing 4 characters of
/// the file name. Assumes a 3-character extension plus dot; any other
/// extension length leaves a trailing fragment in the name. Historical
/// behavior, kept as-is.
pub fn derive_table_name(file_name: &str) -> String {
    let cut = file_name
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    file_name[..cut].to_string()
}

/// Wall-clock duration expressed in minutes, unformatted.
pub fn elapsed_minutes(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() / 60.0
}
