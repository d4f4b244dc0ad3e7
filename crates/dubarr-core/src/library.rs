//! The media-library service boundary
//!
//! Everything Dubarr knows about the catalog comes through [`MediaLibrary`].
//! [`crate::SonarrClient`] implements it over HTTP; tests substitute
//! in-memory implementations.

use async_trait::async_trait;

use crate::catalog::{assemble_episodes, Series};
use crate::error::Result;
use crate::types::{EpisodeFile, EpisodeInfo, SeriesSummary};

/// Read access to a Sonarr-like media library
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// All series in the library
    async fn list_series(&self) -> Result<Vec<SeriesSummary>>;

    /// Episode metadata for one series
    async fn list_episode_infos(&self, series_id: i64) -> Result<Vec<EpisodeInfo>>;

    /// Episode files, with their audio-language labels, for one series
    async fn list_episode_files(&self, series_id: i64) -> Result<Vec<EpisodeFile>>;
}

/// Fetch episodes and files for `summary` and build its [`Series`].
pub async fn fetch_series_detail<L>(library: &L, summary: SeriesSummary) -> Result<Series>
where
    L: MediaLibrary + ?Sized,
{
    let infos = library.list_episode_infos(summary.id).await?;
    let files = library.list_episode_files(summary.id).await?;
    let episodes = assemble_episodes(infos, files);
    Ok(Series::new(summary, episodes))
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory library for tests

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::MediaLibrary;
    use crate::error::{DubarrError, Result};
    use crate::types::{EpisodeFile, EpisodeInfo, SeriesSummary};

    #[derive(Default)]
    pub struct MockLibrary {
        pub series: Vec<SeriesSummary>,
        pub infos: HashMap<i64, Vec<EpisodeInfo>>,
        pub files: HashMap<i64, Vec<EpisodeFile>>,
        pub failing: Mutex<HashSet<i64>>,
        pub delays: HashMap<i64, Duration>,
        pub detail_calls: AtomicUsize,
    }

    impl MockLibrary {
        pub fn add(&mut self, summary: SeriesSummary, infos: Vec<EpisodeInfo>, files: Vec<EpisodeFile>) {
            self.infos.insert(summary.id, infos);
            self.files.insert(summary.id, files);
            self.series.push(summary);
        }

        pub fn fail(&self, series_id: i64) {
            self.failing
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(series_id);
        }

        pub fn recover(&self, series_id: i64) {
            self.failing
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .remove(&series_id);
        }

        pub fn calls(&self) -> usize {
            self.detail_calls.load(Ordering::SeqCst)
        }

        fn check(&self, series_id: i64) -> Result<()> {
            let failing = self
                .failing
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if failing.contains(&series_id) {
                return Err(DubarrError::ServiceUnavailable(format!(
                    "series {series_id} unavailable"
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MediaLibrary for MockLibrary {
        async fn list_series(&self) -> Result<Vec<SeriesSummary>> {
            Ok(self.series.clone())
        }

        async fn list_episode_infos(&self, series_id: i64) -> Result<Vec<EpisodeInfo>> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&series_id) {
                tokio::time::sleep(*delay).await;
            }
            self.check(series_id)?;
            Ok(self.infos.get(&series_id).cloned().unwrap_or_default())
        }

        async fn list_episode_files(&self, series_id: i64) -> Result<Vec<EpisodeFile>> {
            self.check(series_id)?;
            Ok(self.files.get(&series_id).cloned().unwrap_or_default())
        }
    }
}
