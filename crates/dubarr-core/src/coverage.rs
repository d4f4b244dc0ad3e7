//! Audio-language coverage verdicts
//!
//! An episode is judged against a set of wanted languages; seasons and
//! series are judged by rolling up the verdicts of their children. Verdicts
//! are never stored on the catalog entities because the wanted set changes
//! interactively.

use serde::{Deserialize, Serialize};

use crate::language::{Language, TrackLanguage};

/// Tri-state coverage of the wanted languages at one catalog node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageVerdict {
    /// Every wanted language is present
    Full,
    /// Some, but not all, wanted languages (or children) are covered
    Partial,
    /// No wanted language is present
    None,
}

impl CoverageVerdict {
    /// Display class the web frontend uses for this verdict
    pub fn css_class(&self) -> &'static str {
        match self {
            CoverageVerdict::Full => "bg-green",
            CoverageVerdict::Partial => "bg-orange",
            CoverageVerdict::None => "bg-red",
        }
    }
}

/// Ordered set of languages the user wants audio for.
///
/// Insertion order is kept and duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WantedLanguages(Vec<Language>);

impl WantedLanguages {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language; returns false if it was already wanted
    pub fn insert(&mut self, language: Language) -> bool {
        if self.0.contains(&language) {
            return false;
        }
        self.0.push(language);
        true
    }

    /// Remove a language; returns false if it was not wanted
    pub fn remove(&mut self, language: &Language) -> bool {
        let before = self.0.len();
        self.0.retain(|wanted| wanted != language);
        self.0.len() != before
    }

    /// Add or remove `language` depending on `enabled`
    pub fn set(&mut self, language: Language, enabled: bool) {
        if enabled {
            self.insert(language);
        } else {
            self.remove(&language);
        }
    }

    /// Whether `language` is wanted
    pub fn contains(&self, language: &Language) -> bool {
        self.0.contains(language)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.0.iter()
    }

    /// Number of wanted languages
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no language is wanted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Language> for WantedLanguages {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        let mut wanted = Self::new();
        for language in iter {
            wanted.insert(language);
        }
        wanted
    }
}

/// Judge a set of audio tracks against the wanted languages.
///
/// Full when every wanted language has a track, None when none has,
/// Partial otherwise. An empty wanted set is vacuously Full.
pub fn coverage_of(present: &[TrackLanguage], wanted: &WantedLanguages) -> CoverageVerdict {
    let mut found = 0;
    for language in wanted.iter() {
        if present.iter().any(|track| track.matches(language)) {
            found += 1;
        }
    }

    if found == wanted.len() {
        CoverageVerdict::Full
    } else if found == 0 {
        CoverageVerdict::None
    } else {
        CoverageVerdict::Partial
    }
}

/// Combine child verdicts into the verdict of their parent.
///
/// Any Partial, or a mix of Full and None, gives Partial. Otherwise the
/// result is Full if any child is Full and None if not. An empty sequence
/// is None.
pub fn rollup<I>(children: I) -> CoverageVerdict
where
    I: IntoIterator<Item = CoverageVerdict>,
{
    let mut any_full = false;
    let mut any_none = false;

    for verdict in children {
        match verdict {
            CoverageVerdict::Partial => return CoverageVerdict::Partial,
            CoverageVerdict::Full => any_full = true,
            CoverageVerdict::None => any_none = true,
        }
    }

    match (any_full, any_none) {
        (true, true) => CoverageVerdict::Partial,
        (true, false) => CoverageVerdict::Full,
        (false, _) => CoverageVerdict::None,
    }
}
