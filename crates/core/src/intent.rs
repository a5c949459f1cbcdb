//! Intent classification
//!
//! Keyword-based categorization of an utterance into a closed set of intents.
//! The keyword sets are bilingual (English + Swedish) because children mix
//! languages freely; classification is therefore language-agnostic.
//!
//! This is the single copy of the keyword policy — every generation provider
//! consumes it, none carries its own list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected conversation intent
///
/// A pure classification of the user's utterance, never of the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Weather,
    Story,
    Song,
    Math,
    General,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Weather => write!(f, "weather"),
            Intent::Story => write!(f, "story"),
            Intent::Song => write!(f, "song"),
            Intent::Math => write!(f, "math"),
            Intent::General => write!(f, "general"),
        }
    }
}

const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "rain", "sunny", "väder", "vädret"];

const STORY_KEYWORDS: &[&str] = &[
    "story",
    "tell me",
    "once upon",
    "berättelse",
    "saga",
    "berätta",
];

const SONG_KEYWORDS: &[&str] = &["sing", "song", "music", "sjung", "sång"];

const MATH_KEYWORDS: &[&str] = &[
    "math",
    "plus",
    "minus",
    "times",
    "divide",
    "calculate",
    "räkna",
    "matte",
];

/// Classify an utterance into an [`Intent`]
///
/// The keyword sets are tested in fixed priority order (weather > story >
/// song > math), short-circuiting on first match; `General` is the default.
pub fn classify(utterance: &str) -> Intent {
    let lower = utterance.to_lowercase();

    let matches = |keywords: &[&str]| keywords.iter().any(|kw| lower.contains(kw));

    if matches(WEATHER_KEYWORDS) {
        Intent::Weather
    } else if matches(STORY_KEYWORDS) {
        Intent::Story
    } else if matches(SONG_KEYWORDS) {
        Intent::Song
    } else if matches(MATH_KEYWORDS) {
        Intent::Math
    } else {
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_category() {
        assert_eq!(classify("What's the weather like?"), Intent::Weather);
        assert_eq!(classify("Tell me a story please"), Intent::Story);
        assert_eq!(classify("Can you sing for me?"), Intent::Song);
        assert_eq!(classify("What is two plus two?"), Intent::Math);
        assert_eq!(classify("I like dinosaurs"), Intent::General);
    }

    #[test]
    fn classifies_swedish_keywords() {
        assert_eq!(classify("Hur är vädret idag?"), Intent::Weather);
        assert_eq!(classify("Berätta en saga"), Intent::Story);
        assert_eq!(classify("Sjung en sång"), Intent::Song);
        assert_eq!(classify("Kan vi räkna?"), Intent::Math);
    }

    #[test]
    fn weather_wins_over_lower_priority_matches() {
        // contains both a weather and a story keyword
        assert_eq!(
            classify("tell me a story about the weather"),
            Intent::Weather
        );
        // story beats song
        assert_eq!(classify("tell me a story with a song"), Intent::Story);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify("WEATHER"), Intent::Weather);
    }

    #[test]
    fn intent_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Weather).unwrap(), "\"weather\"");
    }
}
