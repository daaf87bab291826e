use anyhow::Result;
use clap::Parser;
use inventory_ingest::{config::LoaderConfig, logging, BatchLoader, SqliteStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ingest")]
#[command(about = "Bulk-loads CSV datasets into a SQLite database")]
struct Args {
    /// Path to a JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory scanned for CSV files (default: ./datasets)
    #[arg(long)]
    datasets_dir: Option<PathBuf>,

    /// SQLite database path (default: ./inventory.db)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log file path (default: ./logs/ingestion_db.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(dir) = args.datasets_dir {
        config.datasets_dir = dir;
    }
    if let Some(db) = args.database {
        config.database_path = db;
    }
    if let Some(log_file) = args.log_file {
        config.log.file = log_file;
    }

    logging::init(&config.log)?;

    let store = SqliteStore::open(&config.database_path)?;
    let mut loader = BatchLoader::new(store, config.datasets_dir.clone());

    // A parse failure propagates here and terminates the process with a
    // non-zero status; persistence failures were already logged per file.
    loader.run()?;

    Ok(())
}
