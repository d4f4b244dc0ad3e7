//! Dubarr Core Library
//!
//! This crate answers one question about a Sonarr library: do the audio
//! tracks of each episode, season and series cover the languages the user
//! wants?
//!
//! # Features
//! - Parse Sonarr audio-language labels into normalized languages
//! - Full / Partial / None coverage verdicts with season and series rollup
//! - Per-series detail cache
//! - Live search where every keystroke supersedes the search before it
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use dubarr_core::{CatalogSearch, DubarrConfig, SearchRequest, SonarrClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DubarrConfig::from_env()?;
//!     let client = SonarrClient::with_config(config.client)?;
//!     let search = CatalogSearch::new(Arc::new(client), config.search);
//!     search.load_catalog().await?;
//!
//!     let rows = search.search(SearchRequest::new("bebop", config.wanted)).await??;
//!     for row in rows {
//!         println!("{} {:?}", row.title, row.verdict);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod coverage;
pub mod display;
pub mod error;
pub mod language;
pub mod library;
pub mod query_group;
pub mod search;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use cache::CatalogEntryCache;
pub use catalog::{Episode, Season, Series};
pub use client::{ClientConfig, SonarrClient};
pub use config::DubarrConfig;
pub use coverage::{coverage_of, rollup, CoverageVerdict, WantedLanguages};
pub use display::{
    DisplaySnapshot, DisplayState, EpisodeCoverage, SearchStatus, SeasonCoverage, SeriesCoverage,
};
pub use error::{DubarrError, Result};
pub use language::{parse_audio_languages, Language, TrackLanguage};
pub use library::{fetch_series_detail, MediaLibrary};
pub use query_group::{QueryGroup, QueryHandle};
pub use search::{filter_series, partial_ratio, CatalogSearch, SearchConfig, SearchRequest};
pub use session::{SearchHandle, SearchSession};
pub use types::{EpisodeFile, EpisodeInfo, MediaInfo, SeriesImage, SeriesSummary};
