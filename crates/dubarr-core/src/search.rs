//! Live catalog search
//!
//! [`CatalogSearch`] runs one search batch per keystroke: it filters the
//! preloaded series list, fetches per-series detail through the cache,
//! evaluates coverage and commits the rows to the display state. Batches
//! are started through a [`SearchSession`], so a new keystroke cancels the
//! batch before it.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::cache::CatalogEntryCache;
use crate::coverage::WantedLanguages;
use crate::display::{DisplayState, SearchStatus, SeriesCoverage};
use crate::error::Result;
use crate::library::{fetch_series_detail, MediaLibrary};
use crate::query_group::QueryGroup;
use crate::session::{SearchHandle, SearchSession};
use crate::types::SeriesSummary;

/// Minimum title similarity, out of 100, for a series to match a query
pub const DEFAULT_MIN_SCORE: u32 = 75;

/// Search behavior settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Only list series Sonarr classifies as anime (default: false)
    pub anime_only: bool,
    /// Minimum [`partial_ratio`] a title needs to match (default: 75)
    pub min_score: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            anime_only: false,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Everything a search needs from the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Text typed into the search field; blank lists every series
    pub query: String,
    /// Languages the user currently wants audio for
    pub wanted: WantedLanguages,
}

impl SearchRequest {
    /// Create a request
    pub fn new(query: impl Into<String>, wanted: WantedLanguages) -> Self {
        Self {
            query: query.into(),
            wanted,
        }
    }
}

struct Shared {
    library: Arc<dyn MediaLibrary>,
    catalog: Mutex<Arc<Vec<SeriesSummary>>>,
    cache: CatalogEntryCache,
    queries: QueryGroup,
    session: SearchSession,
    display: DisplayState,
    config: SearchConfig,
}

/// Search coordinator for one UI session.
///
/// Cloning yields another handle to the same coordinator.
#[derive(Clone)]
pub struct CatalogSearch {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for CatalogSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSearch")
            .field("catalog_len", &self.catalog().len())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl CatalogSearch {
    /// Create a coordinator with an empty catalog
    pub fn new(library: Arc<dyn MediaLibrary>, config: SearchConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                library,
                catalog: Mutex::new(Arc::new(Vec::new())),
                cache: CatalogEntryCache::new(),
                queries: QueryGroup::new(),
                session: SearchSession::new(),
                display: DisplayState::new(),
                config,
            }),
        }
    }

    /// Fetch the series list from the library and keep it for searching.
    ///
    /// Returns the number of series loaded.
    ///
    /// # Errors
    /// Whatever the library returns; the previous list is kept.
    pub async fn load_catalog(&self) -> Result<usize> {
        let series = self.shared.library.list_series().await?;
        let count = series.len();
        *self
            .shared
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(series);
        info!(count, "catalog loaded");
        Ok(count)
    }

    /// Replace the searchable series list directly
    pub fn set_catalog(&self, series: Vec<SeriesSummary>) {
        *self
            .shared
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(series);
    }

    fn catalog(&self) -> Arc<Vec<SeriesSummary>> {
        Arc::clone(
            &self
                .shared
                .catalog
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Shared display state the UI renders from
    pub fn display(&self) -> &DisplayState {
        &self.shared.display
    }

    /// Per-series detail cache
    pub fn cache(&self) -> &CatalogEntryCache {
        &self.shared.cache
    }

    /// Fetches of the running batch
    pub fn queries(&self) -> &QueryGroup {
        &self.shared.queries
    }

    /// Session that serializes searches
    pub fn session(&self) -> &SearchSession {
        &self.shared.session
    }

    /// Start a search, superseding any search still running.
    ///
    /// The handle resolves to the rows the search committed,
    /// `DubarrError::Cancelled` if a newer search replaced it, or the fetch
    /// error that stopped it.
    pub fn search(&self, request: SearchRequest) -> SearchHandle<Result<Vec<SeriesCoverage>>> {
        let this = self.clone();
        self.shared
            .session
            .run(move |generation| async move { this.execute(generation, request).await })
    }

    /// Stop the running search without starting another.
    ///
    /// Aborts the search and its in-flight fetches, stops tracking them and
    /// returns the display to `Idle` under a fresh generation.
    pub fn cancel(&self) {
        let shared = &self.shared;
        let generation = shared.session.cancel();
        shared.queries.cancel_all();
        shared.queries.reset();
        shared.display.commit(generation, SearchStatus::Idle);
        debug!(generation, "search cancelled");
    }

    /// Series matching `query`, newest first
    pub fn candidates(&self, query: &str) -> Vec<SeriesSummary> {
        filter_series(&self.catalog(), query, &self.shared.config)
    }

    async fn execute(&self, generation: u64, request: SearchRequest) -> Result<Vec<SeriesCoverage>> {
        let shared = &self.shared;
        if shared.queries.is_active() {
            shared.queries.cancel_all();
            shared.queries.reset();
        }
        if shared.session.is_current(generation) {
            shared.display.begin(generation);
        }

        let candidates = self.candidates(&request.query);
        debug!(
            generation,
            query = %request.query,
            candidates = candidates.len(),
            "search started"
        );

        let mut rows = Vec::new();
        for summary in candidates {
            // Lets a newer search's cancellation land between series instead
            // of only after the whole batch has been fetched.
            tokio::task::yield_now().await;

            let series_id = summary.id;
            let library = Arc::clone(&shared.library);
            let queries = shared.queries.clone();
            let fetched = shared
                .cache
                .get_or_fetch(series_id, move || async move {
                    queries
                        .spawn(async move { fetch_series_detail(library.as_ref(), summary).await })
                        .await?
                })
                .await;

            let series = match fetched {
                Ok(series) => series,
                Err(error) if error.is_cancelled() => {
                    // Fetches were cancelled without a newer search taking over.
                    if shared.session.is_current(generation) {
                        shared.queries.reset();
                        self.publish(generation, SearchStatus::Idle);
                    }
                    return Err(error);
                }
                Err(error) => {
                    warn!(generation, series_id, %error, "search aborted by fetch failure");
                    shared.queries.reset();
                    self.publish(generation, SearchStatus::Failed(error.to_string()));
                    return Err(error);
                }
            };

            if series.is_empty() {
                continue;
            }
            rows.push(SeriesCoverage::build(&series, &request.wanted));
        }

        shared.queries.reset();
        debug!(generation, results = rows.len(), "search finished");
        self.publish(generation, SearchStatus::Ready(rows.clone()));
        Ok(rows)
    }

    fn publish(&self, generation: u64, status: SearchStatus) {
        if self.shared.session.is_current(generation) {
            self.shared.display.commit(generation, status);
        }
    }
}

/// Filter and order the catalog for a query.
///
/// A blank query keeps every series. Otherwise a title matches when its
/// [`partial_ratio`] against the query reaches `config.min_score`. Results
/// are sorted by date added, newest first.
pub fn filter_series(catalog: &[SeriesSummary], query: &str, config: &SearchConfig) -> Vec<SeriesSummary> {
    let query = query.trim();

    let mut matches: Vec<SeriesSummary> = catalog
        .iter()
        .filter(|series| !config.anime_only || series.is_anime())
        .filter(|series| query.is_empty() || partial_ratio(query, &series.title) >= config.min_score)
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.added.cmp(&a.added));
    matches
}

/// Similarity of `query` to the best-matching part of `title`, 0 to 100.
///
/// The shorter string is compared, ignoring case, against every window of
/// the longer one of the same length. Each comparison scores `2 * lcs / (len_a + len_b)`, where `lcs` is
/// the longest common subsequence, so one transposition in a five-letter
/// word still scores 80.
pub fn partial_ratio(query: &str, title: &str) -> u32 {
    let query: Vec<char> = query.to_lowercase().chars().collect();
    let title: Vec<char> = title.to_lowercase().chars().collect();
    let (short, long) = if query.len() <= title.len() {
        (query, title)
    } else {
        (title, query)
    };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    let width = short.len();
    let mut best = 0;
    for start in 0..=long.len() - width {
        best = best.max(ratio(&short, &long[start..start + width]));
        if best == 100 {
            return best;
        }
    }
    best
}

fn ratio(a: &[char], b: &[char]) -> u32 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    (200 * longest_common_subsequence(a, b) / total) as u32
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if x == y {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
