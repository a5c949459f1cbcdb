//! Persona system instructions
//!
//! Two fixed, hand-written instructions — one per supported locale — each
//! independently constraining vocabulary, response length, forbidden topics,
//! and the output language. Selected by target language at generation time.

use plushpal_core::Language;

const ENGLISH_PERSONA: &str = "\
You are a friendly AI assistant inside a plush toy, talking to children aged 3-10.
Use simple, warm, and encouraging language. Keep responses short (2-3 sentences).
Be playful and imaginative. Never use complex words or scary topics.
Always respond in English.";

const SWEDISH_PERSONA: &str = "\
Du är en vänlig AI-assistent i en gosig leksak som pratar med barn 3-10 år.
Använd enkelt, varmt och uppmuntrande språk. Håll svaren korta (2-3 meningar).
Var lekfull och fantasifull. Använd aldrig komplicerade ord eller läskiga ämnen.
Svara alltid på svenska.";

const STORYBOOK_INSTRUCTION: &str = "\
You are a whimsical storybook narrator for children aged 3-10.
Use magical, warm, and child-friendly language.
Create engaging stories with:
- Simple vocabulary
- Exciting adventures
- Positive lessons
- Happy endings
- 3-5 minutes reading time (500-750 words)

Make every story fun, educational, and age-appropriate.";

/// System instruction for conversational turns in the given language
pub fn system_instruction(language: Language) -> &'static str {
    match language {
        Language::Swedish => SWEDISH_PERSONA,
        Language::English => ENGLISH_PERSONA,
    }
}

/// System instruction for long-form story generation
pub fn storybook_instruction() -> &'static str {
    STORYBOOK_INSTRUCTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_matches_language() {
        assert!(system_instruction(Language::Swedish).contains("svenska"));
        assert!(system_instruction(Language::English).contains("English"));
    }

    #[test]
    fn storybook_instruction_is_long_form() {
        assert!(storybook_instruction().contains("storybook narrator"));
    }
}
