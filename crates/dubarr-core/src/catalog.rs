//! Episodes, seasons and series with their audio languages
//!
//! These are built once per fetch from Sonarr responses and never mutated
//! afterwards. Coverage is computed on request for whatever wanted-language
//! set the caller passes in.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::coverage::{coverage_of, rollup, CoverageVerdict, WantedLanguages};
use crate::language::{parse_audio_languages, TrackLanguage};
use crate::types::{EpisodeFile, EpisodeInfo, SeriesSummary};

/// Season number Sonarr uses for specials
pub const SPECIALS_SEASON: u32 = 0;

/// A single episode with a file on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    info: EpisodeInfo,
    file: EpisodeFile,
    languages: Vec<TrackLanguage>,
}

impl Episode {
    /// Pair an episode with its file and parse the file's audio languages
    pub fn new(info: EpisodeInfo, file: EpisodeFile) -> Self {
        let languages = file
            .media_info
            .as_ref()
            .map(|media| parse_audio_languages(&media.audio_languages))
            .unwrap_or_default();
        Self {
            info,
            file,
            languages,
        }
    }

    /// Episode metadata
    pub fn info(&self) -> &EpisodeInfo {
        &self.info
    }

    /// Episode file metadata
    pub fn file(&self) -> &EpisodeFile {
        &self.file
    }

    /// Audio track languages in file order
    pub fn languages(&self) -> &[TrackLanguage] {
        &self.languages
    }

    /// Coverage of the wanted languages by this episode's audio tracks
    pub fn coverage(&self, wanted: &WantedLanguages) -> CoverageVerdict {
        coverage_of(&self.languages, wanted)
    }
}

/// All episodes of one season
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    number: u32,
    episodes: Vec<Episode>,
}

impl Season {
    /// Create a season from its episodes
    pub fn new(number: u32, episodes: Vec<Episode>) -> Self {
        Self { number, episodes }
    }

    /// Season number, 0 for specials
    pub fn number(&self) -> u32 {
        self.number
    }

    /// `"Specials"` for season 0, `"Season N"` otherwise
    pub fn display_name(&self) -> String {
        if self.number == SPECIALS_SEASON {
            "Specials".to_string()
        } else {
            format!("Season {}", self.number)
        }
    }

    /// Episodes in the order Sonarr listed them
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Rolled-up coverage of this season's episodes
    pub fn coverage(&self, wanted: &WantedLanguages) -> CoverageVerdict {
        rollup(self.episodes.iter().map(|episode| episode.coverage(wanted)))
    }
}

/// A series and its seasons
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    summary: SeriesSummary,
    seasons: BTreeMap<u32, Season>,
}

impl Series {
    /// Build a series, splitting the flat episode list into seasons.
    pub fn new(summary: SeriesSummary, episodes: Vec<Episode>) -> Self {
        Self {
            summary,
            seasons: split_into_seasons(episodes),
        }
    }

    /// Series metadata from the catalog listing
    pub fn summary(&self) -> &SeriesSummary {
        &self.summary
    }

    /// Sonarr series identifier
    pub fn id(&self) -> i64 {
        self.summary.id
    }

    /// Seasons in ascending number order
    pub fn seasons(&self) -> impl Iterator<Item = &Season> {
        self.seasons.values()
    }

    /// Look up a season by number
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.get(&number)
    }

    /// Every episode across all seasons
    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.seasons.values().flat_map(|season| season.episodes.iter())
    }

    /// Whether the series has no episode files at all
    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Rolled-up coverage of this series' seasons
    pub fn coverage(&self, wanted: &WantedLanguages) -> CoverageVerdict {
        rollup(self.seasons.values().map(|season| season.coverage(wanted)))
    }
}

/// Group episodes by season number, keeping their relative order.
pub fn split_into_seasons(episodes: Vec<Episode>) -> BTreeMap<u32, Season> {
    let mut grouped: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();
    for episode in episodes {
        grouped
            .entry(episode.info.season_number)
            .or_default()
            .push(episode);
    }

    grouped
        .into_iter()
        .map(|(number, episodes)| (number, Season::new(number, episodes)))
        .collect()
}

/// Join episode metadata with episode files.
///
/// Episodes without a file are skipped. An episode pointing at a file id
/// that is not in `files` is skipped with a warning.
pub fn assemble_episodes(infos: Vec<EpisodeInfo>, files: Vec<EpisodeFile>) -> Vec<Episode> {
    let files_by_id: HashMap<i64, EpisodeFile> =
        files.into_iter().map(|file| (file.id, file)).collect();

    let mut episodes = Vec::new();
    for info in infos {
        if !info.has_file {
            continue;
        }
        // Two episodes may share one file (multi-episode files).
        let file = match files_by_id.get(&info.episode_file_id) {
            Some(file) => file.clone(),
            None => {
                warn!(
                    series_id = info.series_id,
                    episode_id = info.id,
                    episode_file_id = info.episode_file_id,
                    "episode references a file that was not returned"
                );
                continue;
            }
        };
        episodes.push(Episode::new(info, file));
    }
    episodes
}


#[cfg(test)]
mod tests {
    use super::fixtures::{episode, file, info, summary};
    use super::*;
    use crate::language::Language;

    fn wanted(languages: &[Language]) -> WantedLanguages {
        languages.iter().copied().collect()
    }

    #[test]
    fn test_episode_parses_languages() {
        let ep = episode(1, 1, "English / Japanese");
        assert_eq!(ep.languages().len(), 2);
    }

    #[test]
    fn test_episode_without_media_info_has_no_tracks() {
        let mut f = file(7, "");
        f.media_info = None;
        let ep = Episode::new(info(1, 1, 1, 7), f);
        assert!(ep.languages().is_empty());
        assert_eq!(
            ep.coverage(&wanted(&[Language::english()])),
            CoverageVerdict::None
        );
    }

    #[test]
    fn test_scenario_single_wanted_language() {
        let wanted = wanted(&[Language::english()]);
        let first = episode(1, 1, "English / Japanese");
        let second = episode(1, 2, "");
        assert_eq!(first.coverage(&wanted), CoverageVerdict::Full);
        assert_eq!(second.coverage(&wanted), CoverageVerdict::None);

        let season = Season::new(1, vec![first, second]);
        assert_eq!(season.coverage(&wanted), CoverageVerdict::Partial);
    }

    #[test]
    fn test_scenario_episode_missing_one_of_two_languages() {
        let wanted = wanted(&[Language::english(), Language::japanese()]);
        let ep = episode(1, 1, "English");
        assert_eq!(ep.coverage(&wanted), CoverageVerdict::Partial);
    }

    #[test]
    fn test_scenario_series_rollup() {
        let wanted = wanted(&[Language::english()]);

        let full = Series::new(
            summary(1, "Full"),
            vec![
                episode(1, 1, "English"),
                episode(2, 1, "English"),
                episode(3, 1, "eng/jpn"),
            ],
        );
        assert_eq!(full.coverage(&wanted), CoverageVerdict::Full);

        let mixed = Series::new(
            summary(2, "Mixed"),
            vec![
                episode(1, 1, "English"),
                episode(2, 1, "Japanese"),
                episode(3, 1, "English"),
            ],
        );
        assert_eq!(mixed.coverage(&wanted), CoverageVerdict::Partial);
    }

    #[test]
    fn test_empty_wanted_rolls_up_to_full() {
        let series = Series::new(
            summary(1, "Any"),
            vec![episode(1, 1, ""), episode(2, 1, "Japanese")],
        );
        assert_eq!(series.coverage(&WantedLanguages::new()), CoverageVerdict::Full);
    }

    #[test]
    fn test_split_into_seasons_groups_and_orders() {
        let series = Series::new(
            summary(1, "Order"),
            vec![
                episode(2, 1, "English"),
                episode(0, 1, "English"),
                episode(1, 2, "English"),
                episode(1, 1, "English"),
            ],
        );

        let numbers: Vec<u32> = series.seasons().map(Season::number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);

        let season_one = series.season(1).unwrap();
        let order: Vec<u32> = season_one
            .episodes()
            .iter()
            .map(|ep| ep.info().episode_number)
            .collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(series.episodes().count(), 4);
    }

    #[test]
    fn test_season_display_name() {
        assert_eq!(Season::new(0, Vec::new()).display_name(), "Specials");
        assert_eq!(Season::new(3, Vec::new()).display_name(), "Season 3");
    }

    #[test]
    fn test_assemble_skips_episodes_without_file() {
        let infos = vec![info(1, 1, 1, 10), info(2, 1, 2, 0)];
        let files = vec![file(10, "English")];
        let episodes = assemble_episodes(infos, files);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].info().id, 1);
    }

    #[test]
    fn test_assemble_skips_dangling_file_reference() {
        let infos = vec![info(1, 1, 1, 10), info(2, 1, 2, 99)];
        let files = vec![file(10, "English")];
        let episodes = assemble_episodes(infos, files);
        assert_eq!(episodes.len(), 1);
    }

    #[test]
    fn test_assemble_shared_file() {
        let infos = vec![info(1, 1, 1, 10), info(2, 1, 2, 10)];
        let files = vec![file(10, "Japanese")];
        let episodes = assemble_episodes(infos, files);
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].file(), episodes[1].file());
    }

    #[test]
    fn test_series_without_files_is_empty() {
        let series = Series::new(summary(1, "Nothing"), Vec::new());
        assert!(series.is_empty());
        assert_eq!(
            series.coverage(&wanted(&[Language::english()])),
            CoverageVerdict::None
        );
    }
}
