//! Dubarr Tauri Integration
//!
//! This crate provides the Tauri commands and managed state behind the
//! Dubarr search window.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dubarr_tauri::AppState;
//! use tauri::Manager;
//!
//! fn main() {
//!     dubarr_tauri::init_tracing();
//!
//!     tauri::Builder::default()
//!         .setup(|app| {
//!             app.manage(AppState::from_env()?);
//!             Ok(())
//!         })
//!         .invoke_handler(tauri::generate_handler![
//!             dubarr_tauri::commands::search,
//!             dubarr_tauri::commands::set_language,
//!             dubarr_tauri::commands::wanted_languages,
//!             dubarr_tauri::commands::available_languages,
//!             dubarr_tauri::commands::display_state,
//!             dubarr_tauri::commands::reload_catalog,
//!             dubarr_tauri::commands::cancel_search,
//!         ])
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! # Commands
//! - `search` - Search the catalog as the user types
//! - `set_language` - Toggle a wanted language and search again
//! - `wanted_languages` - Languages currently wanted
//! - `available_languages` - Languages offered as toggles
//! - `display_state` - Results the newest search committed
//! - `reload_catalog` - Fetch the series list from Sonarr again
//! - `cancel_search` - Stop the running search, e.g. when leaving the page

pub mod commands;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dubarr_core::{
    CatalogSearch, DisplaySnapshot, DubarrConfig, Language, MediaLibrary,
    SearchHandle, SearchRequest, SeriesCoverage, SonarrClient, WantedLanguages,
};

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// How a search command ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The search ran to completion and committed these rows
    Completed { results: Vec<SeriesCoverage> },
    /// A newer search replaced this one, or it was cancelled; its rows
    /// were not committed
    Superseded,
}

/// A language toggle as shown in the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    /// Normalized tag, e.g. `"en"`
    pub tag: &'static str,
    /// English display name
    pub name: &'static str,
    /// Whether the language is currently wanted
    pub wanted: bool,
}

/// Application state managed by Tauri.
///
/// Holds the search coordinator together with the UI inputs that every
/// search is started from: the wanted languages and the last query typed.
pub struct AppState {
    search: CatalogSearch,
    selectable: Vec<Language>,
    wanted: Mutex<WantedLanguages>,
    query: Mutex<String>,
}

impl AppState {
    /// Create state from `DUBARR_*` environment variables.
    ///
    /// # Errors
    /// Returns an error string if the configuration is invalid or the
    /// Sonarr client cannot be built.
    pub fn from_env() -> Result<Self, String> {
        let config = DubarrConfig::from_env().map_err(|e| e.to_string())?;
        Self::new(config)
    }

    /// Create state talking to the Sonarr instance in `config`.
    ///
    /// The catalog starts empty; call [`AppState::reload_catalog`] to fill it.
    ///
    /// # Errors
    /// Returns an error string if the Sonarr client cannot be built.
    pub fn new(config: DubarrConfig) -> Result<Self, String> {
        let client = SonarrClient::with_config(config.client.clone()).map_err(|e| e.to_string())?;
        info!(base_url = client.base_url(), "using Sonarr");
        Ok(Self::with_library(Arc::new(client), config))
    }

    /// Create state over any media library
    pub fn with_library(library: Arc<dyn MediaLibrary>, config: DubarrConfig) -> Self {
        Self {
            search: CatalogSearch::new(library, config.search),
            selectable: config.selectable,
            wanted: Mutex::new(config.wanted),
            query: Mutex::new(String::new()),
        }
    }

    fn wanted_guard(&self) -> MutexGuard<'_, WantedLanguages> {
        self.wanted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn query_guard(&self) -> MutexGuard<'_, String> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Search coordinator
    pub fn catalog_search(&self) -> &CatalogSearch {
        &self.search
    }

    /// Languages currently wanted
    pub fn wanted(&self) -> WantedLanguages {
        self.wanted_guard().clone()
    }

    /// Selectable languages with their toggle state
    pub fn languages(&self) -> Vec<LanguageOption> {
        let wanted = self.wanted_guard();
        self.selectable
            .iter()
            .map(|language| LanguageOption {
                tag: language.tag(),
                name: language.display_name(),
                wanted: wanted.contains(language),
            })
            .collect()
    }

    /// Results the newest search committed
    pub fn display(&self) -> DisplaySnapshot {
        self.search.display().snapshot()
    }

    /// Start a search for `query`, superseding the running one
    pub fn start_search(&self, query: String) -> SearchHandle<dubarr_core::Result<Vec<SeriesCoverage>>> {
        *self.query_guard() = query.clone();
        let request = SearchRequest::new(query, self.wanted());
        self.search.search(request)
    }

    /// Search for `query` and wait for the outcome.
    ///
    /// # Errors
    /// The error message if a fetch failed.
    pub async fn search(&self, query: String) -> Result<SearchOutcome, String> {
        outcome(self.start_search(query).await)
    }

    /// Mark `tag` as wanted or not, then search the last query again.
    ///
    /// # Errors
    /// Returns an error string if `tag` is not a selectable language or the
    /// new search fails.
    pub async fn set_language(&self, tag: &str, enabled: bool) -> Result<SearchOutcome, String> {
        let language = self.selectable_language(tag)?;
        self.wanted_guard().set(language, enabled);

        let query = self.query_guard().clone();
        self.search(query).await
    }

    /// Fetch the series list again, then search the last query.
    ///
    /// # Errors
    /// Returns an error string if the series list cannot be fetched.
    pub async fn reload_catalog(&self) -> Result<usize, String> {
        let count = self.search.load_catalog().await.map_err(|e| e.to_string())?;
        let query = self.query_guard().clone();
        drop(self.start_search(query));
        Ok(count)
    }

    /// Stop the running search and return the display to idle
    pub fn cancel_search(&self) {
        self.search.cancel();
    }

    fn selectable_language(&self, tag: &str) -> Result<Language, String> {
        Language::from_label(tag)
            .filter(|language| self.selectable.contains(language))
            .ok_or_else(|| format!("Language not available: {tag}"))
    }
}

/// Collapse a finished search into what the frontend sees
fn outcome(
    joined: dubarr_core::Result<dubarr_core::Result<Vec<SeriesCoverage>>>,
) -> Result<SearchOutcome, String> {
    match joined.and_then(|searched| searched) {
        Ok(results) => Ok(SearchOutcome::Completed { results }),
        Err(error) if error.is_cancelled() => Ok(SearchOutcome::Superseded),
        Err(error) => Err(error.to_string()),
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("search", &self.search)
            .field("selectable", &self.selectable)
            .finish_non_exhaustive()
    }
}
