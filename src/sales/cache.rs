//! Single-entry dataset cache keyed by source connection parameters
//!
//! The first request for a source fetches and stores the table; later
//! requests for the same key reuse it until `invalidate` or `reload`.
//! Failed fetches are never stored.

use super::error::Result;
use super::source::{SalesSource, SourceKey};
use super::table::SalesTable;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Mutex<Option<(SourceKey, Arc<SalesTable>)>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<(SourceKey, Arc<SalesTable>)>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached table for `source`, fetching it on a miss
    pub async fn get_or_fetch<S: SalesSource>(&self, source: &S) -> Result<Arc<SalesTable>> {
        let key = source.key();
        if let Some(table) = self.cached(&key) {
            tracing::debug!(source = %key, "Dataset cache hit");
            return Ok(table);
        }

        tracing::debug!(source = %key, "Dataset cache miss");
        Ok(self.store(key, source.fetch().await?))
    }

    /// Drop whatever is cached and fetch again
    pub async fn reload<S: SalesSource>(&self, source: &S) -> Result<Arc<SalesTable>> {
        let key = source.key();
        tracing::info!(source = %key, "Reloading dataset");
        self.invalidate();
        Ok(self.store(key, source.fetch().await?))
    }

    /// Drop the cached table
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("Dataset cache invalidated");
        }
    }

    pub fn is_cached(&self, key: &SourceKey) -> bool {
        self.cached(key).is_some()
    }

    fn cached(&self, key: &SourceKey) -> Option<Arc<SalesTable>> {
        self.lock()
            .as_ref()
            .filter(|(cached_key, _)| cached_key == key)
            .map(|(_, table)| Arc::clone(table))
    }

    fn store(&self, key: SourceKey, table: SalesTable) -> Arc<SalesTable> {
        let table = Arc::new(table);
        *self.lock() = Some((key, Arc::clone(&table)));
        table
    }
}
