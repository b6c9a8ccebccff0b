use crate::storage::traits::{PageSink, StorageError, StorageResult};
use std::sync::Mutex;

/// In-memory sink, handy for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    pages: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far
    pub fn pages(&self) -> Vec<(String, Vec<u8>)> {
        self.pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    pub fn urls(&self) -> Vec<String> {
        self.pages().into_iter().map(|(url, _)| url).collect()
    }
}

impl PageSink for MemorySink {
    fn store(&self, url: &str, body: &[u8]) -> StorageResult<()> {
        let mut pages = self.pages.lock().map_err(|_| StorageError::Poisoned)?;
        pages.push((url.to_string(), body.to_vec()));
        Ok(())
    }
}
