//! Runtime configuration
//!
//! Dubarr is configured from environment variables only:
//!
//! | Variable              | Meaning                                  | Default                  |
//! |-----------------------|------------------------------------------|--------------------------|
//! | `DUBARR_HOST_URL`     | Sonarr root URL including port           | `http://localhost:8989`  |
//! | `DUBARR_API_KEY`      | Sonarr API key                           | empty                    |
//! | `DUBARR_TIMEOUT_SECS` | Request timeout in seconds               | none                     |
//! | `DUBARR_ANIME_ONLY`   | Only list anime series                   | `false`                  |
//! | `DUBARR_MIN_SCORE`    | Title similarity needed to match, 0-100  | `75`                     |
//! | `DUBARR_LANGUAGES`    | Comma-separated languages offered as filters | `en,ja`              |
//! | `DUBARR_WANTED`       | Comma-separated languages wanted at start | `en`                    |

use crate::client::ClientConfig;
use crate::coverage::WantedLanguages;
use crate::error::{DubarrError, Result};
use crate::language::{default_selectable_languages, Language};
use crate::search::SearchConfig;

const HOST_URL: &str = "DUBARR_HOST_URL";
const API_KEY: &str = "DUBARR_API_KEY";
const TIMEOUT_SECS: &str = "DUBARR_TIMEOUT_SECS";
const ANIME_ONLY: &str = "DUBARR_ANIME_ONLY";
const MIN_SCORE: &str = "DUBARR_MIN_SCORE";
const LANGUAGES: &str = "DUBARR_LANGUAGES";
const WANTED: &str = "DUBARR_WANTED";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct DubarrConfig {
    /// Sonarr connection settings
    pub client: ClientConfig,
    /// Search behavior
    pub search: SearchConfig,
    /// Languages the user can toggle
    pub selectable: Vec<Language>,
    /// Languages wanted when the app starts
    pub wanted: WantedLanguages,
}

impl Default for DubarrConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            search: SearchConfig::default(),
            selectable: default_selectable_languages(),
            wanted: [Language::english()].into_iter().collect(),
        }
    }
}

impl DubarrConfig {
    /// Read the configuration from the process environment
    ///
    /// # Errors
    /// `DubarrError::InvalidConfig` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value
    ///
    /// # Errors
    /// `DubarrError::InvalidConfig` if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(HOST_URL) {
            config.client.base_url = url;
        }
        if let Some(key) = lookup(API_KEY) {
            config.client.api_key = key;
        }
        if let Some(secs) = lookup(TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                DubarrError::InvalidConfig(format!("{TIMEOUT_SECS} must be a number, got {secs:?}"))
            })?;
            config.client.timeout_secs = Some(secs);
        }
        if let Some(flag) = lookup(ANIME_ONLY) {
            config.search.anime_only = parse_flag(ANIME_ONLY, &flag)?;
        }
        if let Some(score) = lookup(MIN_SCORE) {
            config.search.min_score = score
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|score| *score <= 100)
                .ok_or_else(|| {
                    DubarrError::InvalidConfig(format!(
                        "{MIN_SCORE} must be a number from 0 to 100, got {score:?}"
                    ))
                })?;
        }
        if let Some(list) = lookup(LANGUAGES) {
            config.selectable = parse_languages(LANGUAGES, &list)?;
        }
        if let Some(list) = lookup(WANTED) {
            config.wanted = parse_languages(WANTED, &list)?.into_iter().collect();
        }

        // Wanted languages are always offered as filters.
        for language in config.wanted.iter() {
            if !config.selectable.contains(language) {
                config.selectable.push(*language);
            }
        }

        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DubarrError::InvalidConfig(format!(
            "{name} must be true or false, got {value:?}"
        ))),
    }
}

fn parse_languages(name: &str, list: &str) -> Result<Vec<Language>> {
    let mut languages = Vec::new();
    for label in list.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        let language = Language::from_label(label).ok_or_else(|| {
            DubarrError::InvalidConfig(format!("{name} contains unknown language {label:?}"))
        })?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    Ok(languages)
}
