//! Content safety filtering for child-appropriate replies
//!
//! Scans generated text against a fixed banned-term policy. The policy is
//! replace-the-whole-utterance: any match voids the entire response and a
//! locale-appropriate substitute sentence is returned instead. There is no
//! partial redaction, so no fragment of a flagged reply can leak through.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::language::Language;

/// Case-insensitive whole-word patterns, one disjunction per topic area.
const INAPPROPRIATE_PATTERNS: &[&str] = &[
    r"(?i)\b(kill|murder|death|die|blood|weapon|gun|knife)\b",
    r"(?i)\b(hate|stupid|idiot|dumb)\b",
    r"(?i)\b(sex|porn|nude)\b",
    r"(?i)\b(drug|alcohol|beer|wine)\b",
];

static COMPILED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    INAPPROPRIATE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("banned-term pattern compiles"))
        .collect()
});

/// Content filter with per-locale replacement sentences
///
/// The pattern list is process-wide and immutable; the replacement table is
/// resolved once at construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    safe_replies: HashMap<Language, String>,
}

impl ContentFilter {
    /// Build a filter from a locale-to-replacement mapping
    pub fn new(safe_replies: HashMap<Language, String>) -> Self {
        Self { safe_replies }
    }

    /// Check whether `text` contains content inappropriate for children
    ///
    /// Logs the matched pattern, never the text itself.
    pub fn is_inappropriate(&self, text: &str) -> bool {
        for pattern in COMPILED_PATTERNS.iter() {
            if pattern.is_match(text) {
                tracing::warn!(pattern = pattern.as_str(), "inappropriate content detected");
                return true;
            }
        }
        false
    }

    /// Filter `text`, substituting the locale's safe sentence on any match
    pub fn filter<'a>(&self, text: &'a str, language: Language) -> Cow<'a, str> {
        if self.is_inappropriate(text) {
            Cow::Owned(self.safe_reply(language).to_string())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn safe_reply(&self, language: Language) -> &str {
        self.safe_replies
            .get(&language)
            .or_else(|| self.safe_replies.get(&Language::English))
            .map(String::as_str)
            .unwrap_or("Let's talk about something fun and happy instead!")
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        let mut safe_replies = HashMap::new();
        safe_replies.insert(
            Language::English,
            "Let's talk about something fun and happy instead!".to_string(),
        );
        safe_replies.insert(
            Language::Swedish,
            "Vi kan prata om något roligt och glatt istället!".to_string(),
        );
        Self::new(safe_replies)
    }
}
