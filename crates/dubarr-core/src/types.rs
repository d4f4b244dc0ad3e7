//! Data types for the Sonarr API
//!
//! This module contains the response structures Dubarr reads from a Sonarr
//! instance. Only the fields the coverage model needs are decoded; Sonarr
//! sends many more and serde ignores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cover type Sonarr uses for the portrait poster image
pub const POSTER_COVER_TYPE: &str = "poster";

/// Series type Sonarr assigns to anime series
pub const ANIME_SERIES_TYPE: &str = "anime";

/// Artwork attached to a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesImage {
    /// Kind of artwork (`poster`, `banner`, `fanart`, ...)
    pub cover_type: String,
    /// URL relative to the Sonarr root (e.g. `/MediaCover/39/poster.jpg`)
    pub url: String,
}

/// One entry of the Sonarr series list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    /// Sonarr series identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// `standard`, `daily` or `anime`
    #[serde(default)]
    pub series_type: String,
    /// When the series was added to the library
    pub added: DateTime<Utc>,
    /// Available artwork
    #[serde(default)]
    pub images: Vec<SeriesImage>,
}

impl SeriesSummary {
    /// URL of the first poster image, if the series has one
    pub fn poster_url(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.cover_type == POSTER_COVER_TYPE)
            .map(|image| image.url.as_str())
    }

    /// Whether Sonarr classifies this series as anime
    pub fn is_anime(&self) -> bool {
        self.series_type == ANIME_SERIES_TYPE
    }
}

/// Episode metadata as returned by `/api/v3/episode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeInfo {
    /// Sonarr episode identifier
    pub id: i64,
    /// Owning series
    pub series_id: i64,
    /// Season number (0 for specials)
    pub season_number: u32,
    /// Episode number within the season
    pub episode_number: u32,
    /// Episode title
    #[serde(default)]
    pub title: String,
    /// Whether a media file is present on disk
    #[serde(default)]
    pub has_file: bool,
    /// Identifier of the episode file, 0 when there is none
    #[serde(default)]
    pub episode_file_id: i64,
}

/// Media information Sonarr extracted from a file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// Raw audio language label, e.g. `"English / Japanese"` or `"eng/jpn"`
    #[serde(default)]
    pub audio_languages: String,
}

/// Episode file as returned by `/api/v3/episodefile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFile {
    /// Sonarr episode file identifier
    pub id: i64,
    /// Owning series
    pub series_id: i64,
    /// Extracted media information, absent for files Sonarr has not analyzed
    #[serde(default)]
    pub media_info: Option<MediaInfo>,
}
