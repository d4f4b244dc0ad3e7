//! Spoken languages and audio-track label parsing
//!
//! Sonarr reports the audio languages of a file as a single label such as
//! `"English / Japanese"` or `"eng/jpn"`. This module normalizes each part of
//! that label to a [`Language`], or to [`TrackLanguage::Unknown`] when the
//! part is empty or not recognized.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Separator Sonarr places between the languages of a multi-track file
const TRACK_SEPARATOR: char = '/';

/// Known languages: (normalized tag, English name, ISO 639-2 codes).
///
/// The normalized tag is the ISO 639-1 code.
const LANGUAGES: &[(&str, &str, &[&str])] = &[
    ("ar", "Arabic", &["ara"]),
    ("bg", "Bulgarian", &["bul"]),
    ("ca", "Catalan", &["cat"]),
    ("cs", "Czech", &["cze", "ces"]),
    ("da", "Danish", &["dan"]),
    ("de", "German", &["ger", "deu"]),
    ("el", "Greek", &["gre", "ell"]),
    ("en", "English", &["eng"]),
    ("es", "Spanish", &["spa"]),
    ("et", "Estonian", &["est"]),
    ("fa", "Persian", &["per", "fas"]),
    ("fi", "Finnish", &["fin"]),
    ("fr", "French", &["fre", "fra"]),
    ("he", "Hebrew", &["heb"]),
    ("hi", "Hindi", &["hin"]),
    ("hr", "Croatian", &["hrv"]),
    ("hu", "Hungarian", &["hun"]),
    ("id", "Indonesian", &["ind"]),
    ("is", "Icelandic", &["ice", "isl"]),
    ("it", "Italian", &["ita"]),
    ("ja", "Japanese", &["jpn"]),
    ("ko", "Korean", &["kor"]),
    ("lt", "Lithuanian", &["lit"]),
    ("lv", "Latvian", &["lav"]),
    ("ms", "Malay", &["may", "msa"]),
    ("nl", "Dutch", &["dut", "nld"]),
    ("no", "Norwegian", &["nor", "nob", "nno"]),
    ("pl", "Polish", &["pol"]),
    ("pt", "Portuguese", &["por"]),
    ("ro", "Romanian", &["rum", "ron"]),
    ("ru", "Russian", &["rus"]),
    ("sk", "Slovak", &["slo", "slk"]),
    ("sl", "Slovenian", &["slv"]),
    ("sr", "Serbian", &["srp"]),
    ("sv", "Swedish", &["swe"]),
    ("ta", "Tamil", &["tam"]),
    ("te", "Telugu", &["tel"]),
    ("th", "Thai", &["tha"]),
    ("tl", "Tagalog", &["tgl", "fil"]),
    ("tr", "Turkish", &["tur"]),
    ("uk", "Ukrainian", &["ukr"]),
    ("vi", "Vietnamese", &["vie"]),
    ("zh", "Chinese", &["chi", "zho"]),
];

/// Alternative names Sonarr and common muxers use for the languages above.
const ALIASES: &[(&str, &str)] = &[
    ("flemish", "nl"),
    ("mandarin", "zh"),
    ("cantonese", "zh"),
    ("castilian", "es"),
    ("farsi", "fa"),
    ("filipino", "tl"),
    ("bokmal", "no"),
    ("norwegian bokmal", "no"),
    ("norwegian nynorsk", "no"),
];

/// A spoken language identified by its normalized tag.
///
/// Two languages are equal when their normalized tags are equal, so
/// `"English"`, `"eng"` and `"en-US"` all produce the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    tag: &'static str,
    name: &'static str,
}

impl Language {
    /// Resolve a label to a known language.
    ///
    /// Accepts English names (case-insensitive, with an optional
    /// parenthesized qualifier such as `"Portuguese (Brazil)"`), ISO 639-1 and
    /// ISO 639-2 codes, and region-qualified tags like `en-US` or `pt_BR`.
    pub fn from_label(label: &str) -> Option<Self> {
        let base = label.split('(').next().unwrap_or_default().trim();
        if base.is_empty() {
            return None;
        }
        let lower = base.to_ascii_lowercase();

        if let Some(language) = Self::lookup(&lower) {
            return Some(language);
        }

        // Region-qualified tags: only the primary subtag matters.
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        if primary != lower && primary.len() <= 3 {
            return Self::lookup(primary);
        }
        None
    }

    fn lookup(lower: &str) -> Option<Self> {
        if let Some((_, tag)) = ALIASES.iter().find(|(alias, _)| *alias == lower) {
            return Self::by_tag(tag);
        }
        LANGUAGES
            .iter()
            .find(|(tag, name, codes)| {
                *tag == lower || name.eq_ignore_ascii_case(lower) || codes.contains(&lower)
            })
            .map(|(tag, name, _)| Self {
                tag: *tag,
                name: *name,
            })
    }

    fn by_tag(tag: &str) -> Option<Self> {
        LANGUAGES
            .iter()
            .find(|(known, _, _)| *known == tag)
            .map(|(tag, name, _)| Self {
                tag: *tag,
                name: *name,
            })
    }

    /// Normalized tag, e.g. `"en"`
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// English display name, e.g. `"English"`
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// English
    pub fn english() -> Self {
        Self {
            tag: "en",
            name: "English",
        }
    }

    /// Japanese
    pub fn japanese() -> Self {
        Self {
            tag: "ja",
            name: "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Language::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown language: {label}")))
    }
}

/// The language of one audio track.
///
/// Untagged or unrecognized tracks are kept as [`TrackLanguage::Unknown`]
/// rather than dropped, and never match a wanted language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackLanguage {
    /// Track tagged with a recognized language
    Known(Language),
    /// Track without a usable language tag
    Unknown,
}

impl TrackLanguage {
    /// Whether this track is in `language`
    pub fn matches(&self, language: &Language) -> bool {
        matches!(self, TrackLanguage::Known(known) if known == language)
    }
}

/// Parse a raw Sonarr audio-language label into one entry per track.
///
/// Order and duplicates are preserved. An empty label yields a single
/// unknown track.
pub fn parse_audio_languages(raw: &str) -> Vec<TrackLanguage> {
    raw.split(TRACK_SEPARATOR)
        .map(str::trim)
        .map(|label| {
            if label.is_empty() {
                return TrackLanguage::Unknown;
            }
            match Language::from_label(label) {
                Some(language) => TrackLanguage::Known(language),
                None => {
                    debug!(label, "unrecognized audio language label");
                    TrackLanguage::Unknown
                }
            }
        })
        .collect()
}

/// Languages offered as filters when the user has not configured any
pub fn default_selectable_languages() -> Vec<Language> {
    vec![Language::english(), Language::japanese()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_names() {
        assert_eq!(Language::from_label("English"), Some(Language::english()));
        assert_eq!(Language::from_label("japanese"), Some(Language::japanese()));
        assert_eq!(Language::from_label("  GERMAN "), Language::from_label("de"));
    }

    #[test]
    fn test_from_label_codes() {
        assert_eq!(Language::from_label("eng"), Some(Language::english()));
        assert_eq!(Language::from_label("jpn"), Some(Language::japanese()));
        assert_eq!(Language::from_label("ger"), Language::from_label("deu"));
        assert_eq!(Language::from_label("fre").map(|l| l.tag()), Some("fr"));
    }

    #[test]
    fn test_from_label_region_and_qualifier() {
        assert_eq!(Language::from_label("en-US"), Some(Language::english()));
        assert_eq!(Language::from_label("pt_BR").map(|l| l.tag()), Some("pt"));
        assert_eq!(
            Language::from_label("Portuguese (Brazil)").map(|l| l.tag()),
            Some("pt")
        );
        assert_eq!(
            Language::from_label("Spanish (Latino)").map(|l| l.tag()),
            Some("es")
        );
    }

    #[test]
    fn test_from_label_aliases() {
        assert_eq!(Language::from_label("Flemish").map(|l| l.tag()), Some("nl"));
        assert_eq!(Language::from_label("Mandarin").map(|l| l.tag()), Some("zh"));
    }

    #[test]
    fn test_from_label_unknown() {
        assert_eq!(Language::from_label(""), None);
        assert_eq!(Language::from_label("Klingon"), None);
        assert_eq!(Language::from_label("und"), None);
        assert_eq!(Language::from_label("xx-YY-long"), None);
    }

    #[test]
    fn test_parse_audio_languages_names() {
        let tracks = parse_audio_languages("English / Japanese");
        assert_eq!(
            tracks,
            vec![
                TrackLanguage::Known(Language::english()),
                TrackLanguage::Known(Language::japanese()),
            ]
        );
    }

    #[test]
    fn test_parse_audio_languages_codes_without_spaces() {
        let tracks = parse_audio_languages("eng/jpn/eng");
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0], tracks[2]);
    }

    #[test]
    fn test_parse_audio_languages_empty_slot() {
        let tracks = parse_audio_languages(" / Japanese");
        assert_eq!(
            tracks,
            vec![
                TrackLanguage::Unknown,
                TrackLanguage::Known(Language::japanese()),
            ]
        );
    }

    #[test]
    fn test_parse_audio_languages_empty_label() {
        assert_eq!(parse_audio_languages(""), vec![TrackLanguage::Unknown]);
    }

    #[test]
    fn test_parse_audio_languages_unrecognized() {
        let tracks = parse_audio_languages("English / Klingon");
        assert_eq!(tracks[1], TrackLanguage::Unknown);
    }

    #[test]
    fn test_unknown_never_matches() {
        assert!(!TrackLanguage::Unknown.matches(&Language::english()));
        assert!(TrackLanguage::Known(Language::english()).matches(&Language::english()));
        assert!(!TrackLanguage::Known(Language::japanese()).matches(&Language::english()));
    }

    #[test]
    fn test_language_serde_uses_tag() {
        let json = serde_json::to_string(&Language::japanese()).unwrap();
        assert_eq!(json, "\"ja\"");
        let back: Language = serde_json::from_str("\"jpn\"").unwrap();
        assert_eq!(back, Language::japanese());
        assert!(serde_json::from_str::<Language>("\"nope\"").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Language::english().to_string(), "English");
        assert_eq!(Language::english().display_name(), "English");
    }
}
