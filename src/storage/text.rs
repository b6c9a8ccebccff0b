//! Append-only text file sink
//!
//! Each page is written as a `URL: <url>` header line, the body, and a blank
//! separator line.

use crate::storage::traits::{PageSink, StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Page sink appending to a single text file
pub struct TextFileSink<W: Write = File> {
    writer: Mutex<BufWriter<W>>,
}

impl TextFileSink {
    /// Opens (or creates) the file in append mode
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> TextFileSink<W> {
    pub(crate) fn from_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
        }
    }
}

/// Renders one record: header line, body, blank separator
fn record(url: &str, body: &[u8]) -> Vec<u8> {
    let header = format!("URL: {}\n", url);
    let mut record = Vec::with_capacity(header.len() + body.len() + 2);
    record.extend_from_slice(header.as_bytes());
    record.extend_from_slice(body);
    record.extend_from_slice(b"\n\n");
    record
}

impl<W: Write + Send> PageSink for TextFileSink<W> {
    fn store(&self, url: &str, body: &[u8]) -> StorageResult<()> {
        let record = record(url, body);
        let mut writer = self.writer.lock().map_err(|_| StorageError::Poisoned)?;
        // One write per record so a failure never leaves a header buffered
        writer.write_all(&record)?;
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        let mut writer = self.writer.lock().map_err(|_| StorageError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}
