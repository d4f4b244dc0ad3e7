//! In-memory cache of fetched series
//!
//! Fetching a series' episodes and files takes two requests, so every
//! series is fetched at most once per process lifetime under normal use.
//! Entries are never invalidated: the library is assumed not to change
//! while a session is open.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::catalog::Series;
use crate::error::{DubarrError, Result};

/// Cache of fetched [`Series`] keyed by Sonarr series id.
///
/// Cloning the cache yields another handle to the same entries.
///
/// Concurrent misses for the same id are not coalesced: each caller runs
/// its own fetch and the last one to finish overwrites the entry.
#[derive(Debug, Clone, Default)]
pub struct CatalogEntryCache {
    entries: Arc<Mutex<HashMap<i64, Arc<Series>>>>,
}

impl CatalogEntryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<i64, Arc<Series>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached series for `series_id`, fetching it on a miss.
    ///
    /// `fetch` is only awaited when nothing is cached, and the entry lock is
    /// not held while it runs. A successful result is stored before it is
    /// returned; a failure stores nothing.
    ///
    /// # Errors
    /// `DubarrError::FetchFailed` wrapping whatever `fetch` returned.
    pub async fn get_or_fetch<F, Fut>(&self, series_id: i64, fetch: F) -> Result<Arc<Series>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Series>>,
    {
        if let Some(series) = self.get(series_id) {
            trace!(series_id, "series cache hit");
            return Ok(series);
        }

        debug!(series_id, "series cache miss, fetching");
        let series = fetch().await.map_err(|source| DubarrError::FetchFailed {
            series_id,
            source: Box::new(source),
        })?;

        let series = Arc::new(series);
        self.entries().insert(series_id, Arc::clone(&series));
        Ok(series)
    }

    /// Cached series for `series_id`, if any
    pub fn get(&self, series_id: i64) -> Option<Arc<Series>> {
        self.entries().get(&series_id).cloned()
    }

    /// Whether `series_id` has an entry
    pub fn contains(&self, series_id: i64) -> bool {
        self.entries().contains_key(&series_id)
    }

    /// Number of cached series
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
