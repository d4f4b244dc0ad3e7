//! Committed search results
//!
//! The display layer renders whatever [`DisplayState`] holds. Searches write
//! to it only through [`DisplayState::begin`] and [`DisplayState::commit`],
//! both of which ignore writes from a generation older than the newest one
//! seen, so a superseded search cannot overwrite a newer one's results.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::trace;

use crate::catalog::{Episode, Season, Series};
use crate::coverage::{CoverageVerdict, WantedLanguages};

/// Coverage of one episode, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeCoverage {
    /// Episode number within its season
    pub episode_number: u32,
    /// Episode title
    pub title: String,
    /// Coverage verdict
    pub verdict: CoverageVerdict,
}

impl EpisodeCoverage {
    fn build(episode: &Episode, wanted: &WantedLanguages) -> Self {
        Self {
            episode_number: episode.info().episode_number,
            title: episode.info().title.clone(),
            verdict: episode.coverage(wanted),
        }
    }
}

/// Coverage of one season and its episodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCoverage {
    /// Season number, 0 for specials
    pub season_number: u32,
    /// `"Specials"` or `"Season N"`
    pub display_name: String,
    /// Rolled-up verdict
    pub verdict: CoverageVerdict,
    /// Episodes in listing order
    pub episodes: Vec<EpisodeCoverage>,
}

impl SeasonCoverage {
    fn build(season: &Season, wanted: &WantedLanguages) -> Self {
        Self {
            season_number: season.number(),
            display_name: season.display_name(),
            verdict: season.coverage(wanted),
            episodes: season
                .episodes()
                .iter()
                .map(|episode| EpisodeCoverage::build(episode, wanted))
                .collect(),
        }
    }
}

/// Coverage of one series, its seasons and episodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesCoverage {
    /// Sonarr series identifier
    pub series_id: i64,
    /// Series title
    pub title: String,
    /// Poster path relative to the Sonarr root
    pub poster_url: Option<String>,
    /// Rolled-up verdict
    pub verdict: CoverageVerdict,
    /// Seasons in ascending order
    pub seasons: Vec<SeasonCoverage>,
}

impl SeriesCoverage {
    /// Evaluate `series` against `wanted`
    pub fn build(series: &Series, wanted: &WantedLanguages) -> Self {
        let summary = series.summary();
        Self {
            series_id: summary.id,
            title: summary.title.clone(),
            poster_url: summary.poster_url().map(str::to_string),
            verdict: series.coverage(wanted),
            seasons: series
                .seasons()
                .map(|season| SeasonCoverage::build(season, wanted))
                .collect(),
        }
    }
}

/// What the results area currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SearchStatus {
    /// No search has run yet
    #[default]
    Idle,
    /// A search is fetching; earlier results are cleared
    Searching,
    /// The newest search finished
    Ready(Vec<SeriesCoverage>),
    /// The newest search could not reach the library
    Failed(String),
}

/// Point-in-time copy of the display state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    /// Generation of the search that last wrote
    pub generation: u64,
    /// Current status
    pub status: SearchStatus,
}

/// Shared, generation-guarded display state.
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    inner: Arc<Mutex<DisplaySnapshot>>,
}

impl DisplayState {
    /// Create an idle display
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, DisplaySnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear results and mark `generation` as searching.
    ///
    /// Returns false, changing nothing, if a newer generation already wrote.
    pub fn begin(&self, generation: u64) -> bool {
        self.commit(generation, SearchStatus::Searching)
    }

    /// Replace the status on behalf of `generation`.
    ///
    /// Returns false, changing nothing, if a newer generation already wrote.
    pub fn commit(&self, generation: u64, status: SearchStatus) -> bool {
        let mut inner = self.inner();
        if generation < inner.generation {
            trace!(
                generation,
                newest = inner.generation,
                "dropping stale display write"
            );
            return false;
        }
        inner.generation = generation;
        inner.status = status;
        true
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.inner().clone()
    }
}
