//! Storage traits and error types
//!
//! This module defines the trait interface for page sinks and associated
//! error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Sink lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for fetched pages
///
/// Append-style: the sink makes no uniqueness promise and may receive pages
/// from several workers at once, so implementations synchronise internally.
pub trait PageSink: Send + Sync {
    /// Persists one fetched page
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the page was fetched from
    /// * `body` - Raw response body
    fn store(&self, url: &str, body: &[u8]) -> StorageResult<()>;

    /// Flushes buffered output; called once when the crawl finishes
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}
