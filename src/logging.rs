//! Log sink setup
//!
//! Logging used to be configured as a global side effect at import time.
//! The entry point now builds the subscriber explicitly from a `LogConfig`
//! and installs it as the global default; tests build the same subscriber
//! over a capturing writer and scope it with
//! `tracing::subscriber::with_default`.
//!
//! Lines are rendered as `timestamp - LEVEL - message`, the shape the
//! historical log file used.

use crate::config::LogConfig;
use crate::error::{IngestError, Result};
use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Timestamp format for log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Event formatter emitting `timestamp - LEVEL - message` lines.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(writer, "{} - {} - ", timestamp, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build a subscriber writing to `make_writer` at the given level.
pub fn subscriber_with_writer<W>(
    level: &str,
    make_writer: W,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(LineFormat)
        .with_writer(make_writer)
        .finish()
}

/// Open the configured log file in append mode and install a global
/// subscriber over it.
pub fn init(config: &LogConfig) -> Result<()> {
    if let Some(parent) = config.file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let subscriber = subscriber_with_writer(&config.level, Mutex::new(file));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| IngestError::Config(format!("Failed to install logger: {}", e)))
}
