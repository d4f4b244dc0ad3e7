//! Tauri commands for Dubarr
//!
//! This module contains all Tauri commands that can be invoked from the frontend.

use tauri::State;

use crate::{AppState, LanguageOption, SearchOutcome};
use dubarr_core::{DisplaySnapshot, WantedLanguages};

/// Search the catalog for series matching the text typed so far.
///
/// Every call supersedes the search before it. A superseded call returns
/// `Superseded` instead of results.
///
/// # Arguments
/// * `query` - Search field contents; blank lists every series
///
/// # Returns
/// * `Ok(SearchOutcome)` with the committed rows, or `Superseded`
/// * `Err(String)` with error message if Sonarr could not be reached
#[tauri::command]
pub async fn search(state: State<'_, AppState>, query: String) -> Result<SearchOutcome, String> {
    state.search(query).await
}

/// Turn a wanted language on or off and search the last query again.
///
/// # Arguments
/// * `tag` - Language tag or name, e.g. `"ja"` or `"Japanese"`
/// * `enabled` - Whether the language is wanted
///
/// # Returns
/// * `Ok(SearchOutcome)` from the search started by the toggle
/// * `Err(String)` if the language is not selectable or the search fails
#[tauri::command]
pub async fn set_language(
    state: State<'_, AppState>,
    tag: String,
    enabled: bool,
) -> Result<SearchOutcome, String> {
    state.set_language(&tag, enabled).await
}

/// Get the languages currently wanted.
#[tauri::command]
pub fn wanted_languages(state: State<'_, AppState>) -> WantedLanguages {
    state.wanted()
}

/// Get every language offered as a toggle.
#[tauri::command]
pub fn available_languages(state: State<'_, AppState>) -> Vec<LanguageOption> {
    state.languages()
}

/// Get the results the newest search committed.
#[tauri::command]
pub fn display_state(state: State<'_, AppState>) -> DisplaySnapshot {
    state.display()
}

/// Fetch the series list from Sonarr again.
///
/// The last query is searched again in the background; poll
/// `display_state` for its results.
///
/// # Returns
/// * `Ok(usize)` with the number of series loaded
/// * `Err(String)` with error message if Sonarr could not be reached
#[tauri::command]
pub async fn reload_catalog(state: State<'_, AppState>) -> Result<usize, String> {
    state.reload_catalog().await
}

/// Stop the running search, e.g. when the search page is left.
///
/// The display returns to idle.
#[tauri::command]
pub fn cancel_search(state: State<'_, AppState>) {
    state.cancel_search();
}
