//! Language detection between the two supported locales
//!
//! A keyword-frequency heuristic, not a classifier: callers must treat the
//! result as a best-effort default. The STT collaborator's reported language
//! always takes precedence when available.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported response languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "sv")]
    Swedish,
    #[default]
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// ISO 639-1 code
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Swedish => "sv",
            Language::English => "en",
        }
    }

    /// Parse a language code, tolerating region suffixes ("sv-SE")
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "sv" | "swedish" => Some(Language::Swedish),
            "en" | "english" => Some(Language::English),
            other if other.starts_with("sv-") => Some(Language::Swedish),
            other if other.starts_with("en-") => Some(Language::English),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Swedish greeting/courtesy words used for detection
const SWEDISH_KEYWORDS: &[&str] = &[
    "hej",
    "hallå",
    "tjena",
    "morsning",
    "godmorgon",
    "godnatt",
    "tack",
    "varsågod",
    "förlåt",
    "ja",
    "nej",
];

/// English counterparts
const ENGLISH_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good night",
    "thanks",
    "please",
    "sorry",
    "yes",
    "no",
];

/// Detect the language of `text`
///
/// Counts keyword occurrences per locale in the lower-cased text. Swedish
/// wins only on a strictly greater count; ties (including zero-zero) resolve
/// to English.
pub fn detect(text: &str) -> Language {
    let lower = text.to_lowercase();

    let swedish_matches = SWEDISH_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    let english_matches = ENGLISH_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();

    if swedish_matches > english_matches {
        tracing::debug!(matches = swedish_matches, "detected Swedish");
        Language::Swedish
    } else {
        tracing::debug!(matches = english_matches, "detected English");
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_swedish_greeting() {
        assert_eq!(detect("hej, tack!"), Language::Swedish);
        assert_eq!(detect("Hallå! Varsågod."), Language::Swedish);
    }

    #[test]
    fn detects_english_greeting() {
        assert_eq!(detect("hello, thanks!"), Language::English);
    }

    #[test]
    fn empty_text_defaults_to_english() {
        assert_eq!(detect(""), Language::English);
    }

    #[test]
    fn tie_resolves_to_english() {
        // one keyword each
        assert_eq!(detect("hej hello"), Language::English);
    }

    #[test]
    fn code_round_trip() {
        assert_eq!(Language::from_code("sv"), Some(Language::Swedish));
        assert_eq!(Language::from_code("en-US"), Some(Language::English));
        assert_eq!(Language::from_code("sv-SE"), Some(Language::Swedish));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::Swedish.as_code(), "sv");
    }
}
