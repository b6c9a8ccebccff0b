//! Storage module for persisting fetched pages
//!
//! This module provides the `PageSink` seam the workers write through and the
//! concrete sinks behind it:
//! - Append-only text file (`URL: ...` records)
//! - SQLite `pages` table
//! - In-memory collection for tests

mod memory;
mod schema;
mod sqlite;
mod text;
mod traits;

pub use memory::MemorySink;
pub use sqlite::SqliteSink;
pub use text::TextFileSink;
pub use traits::{PageSink, StorageError, StorageResult};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;
use std::sync::Arc;

/// Opens the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - Output section of the crawler configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn PageSink>)` - Sink ready to be shared between workers
/// * `Err(StorageError)` - The file or database could not be opened
pub fn open_sink(config: &OutputConfig) -> StorageResult<Arc<dyn PageSink>> {
    let path = Path::new(&config.path);
    let sink: Arc<dyn PageSink> = match config.format {
        OutputFormat::Text => Arc::new(TextFileSink::open(path)?),
        OutputFormat::Sqlite => Arc::new(SqliteSink::new(path)?),
    };
    tracing::debug!("Opened {:?} sink at {}", config.format, config.path);
    Ok(sink)
}
