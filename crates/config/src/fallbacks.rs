//! Locale-keyed fallback message tables
//!
//! Every degraded path in the pipeline speaks a fixed, child-appropriate
//! sentence instead of an error. The tables are plain configuration — loaded
//! once at startup, overridable from config files — so no component carries
//! inline per-locale conditionals.

use plushpal_core::Language;
use serde::{Deserialize, Serialize};

/// A pair of texts, one per supported locale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleText {
    pub en: String,
    pub sv: String,
}

impl LocaleText {
    fn new(en: &str, sv: &str) -> Self {
        Self {
            en: en.to_string(),
            sv: sv.to_string(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Swedish => &self.sv,
        }
    }
}

/// Fallback texts per failure class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackMessages {
    /// Spoken when every generation provider failed
    #[serde(default = "default_generation")]
    pub generation: LocaleText,
    /// Substituted for a reply that tripped the content filter
    #[serde(default = "default_safety")]
    pub safety: LocaleText,
    /// Spoken when synthesis of the real reply failed
    #[serde(default = "default_synthesis")]
    pub synthesis: LocaleText,
    /// Returned when transcription produced nothing usable
    #[serde(default = "default_transcription")]
    pub transcription: LocaleText,
    /// Returned when the weather collaborator is unreachable
    #[serde(default = "default_weather")]
    pub weather: LocaleText,
}

fn default_generation() -> LocaleText {
    LocaleText::new(
        "Oops! My brain got a little fuzzy. Can you ask me again?",
        "Hoppsan! Mitt huvud blev lite grumligt. Kan du fråga igen?",
    )
}

fn default_safety() -> LocaleText {
    LocaleText::new(
        "Let's talk about something fun and happy instead!",
        "Vi kan prata om något roligt och glatt istället!",
    )
}

fn default_synthesis() -> LocaleText {
    LocaleText::new(
        "I'm having trouble speaking right now. Please try again!",
        "Jag har problem med att prata just nu. Försök igen!",
    )
}

fn default_transcription() -> LocaleText {
    LocaleText::new(
        "I didn't quite catch that. Could you please say that again?",
        "Jag hörde inte riktigt. Kan du säga det igen?",
    )
}

fn default_weather() -> LocaleText {
    LocaleText::new(
        "I can't check the weather right now, but you can look outside!",
        "Jag kan inte kolla vädret just nu, men du kan titta ut!",
    )
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            safety: default_safety(),
            synthesis: default_synthesis(),
            transcription: default_transcription(),
            weather: default_weather(),
        }
    }
}

impl FallbackMessages {
    /// Build the safety-replacement map consumed by the content filter
    pub fn safety_replies(&self) -> std::collections::HashMap<Language, String> {
        let mut map = std::collections::HashMap::new();
        map.insert(Language::English, self.safety.en.clone());
        map.insert(Language::Swedish, self.safety.sv.clone());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_lookup() {
        let messages = FallbackMessages::default();
        assert!(messages.generation.get(Language::English).starts_with("Oops!"));
        assert!(messages.generation.get(Language::Swedish).starts_with("Hoppsan!"));
    }

    #[test]
    fn safety_replies_cover_both_locales() {
        let map = FallbackMessages::default().safety_replies();
        assert_eq!(map.len(), 2);
    }
}
