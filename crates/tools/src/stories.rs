//! Curated story-prompt catalog
//!
//! Pure data: three series of four stories each, with enough metadata to
//! build a generation prompt in either locale. The catalog is also what the
//! offline pre-rendering binary walks.

use plushpal_core::Language;
use serde::Serialize;

/// A story series with a recurring main character
#[derive(Debug, Clone, Serialize)]
pub struct StorySeries {
    pub id: &'static str,
    pub name: &'static str,
    pub character: &'static str,
    pub theme: &'static str,
    pub stories: &'static [StoryEntry],
}

/// One story in a series
#[derive(Debug, Clone, Serialize)]
pub struct StoryEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub location: &'static str,
    /// Landmarks, friends, or activities woven into the story
    pub highlights: &'static [&'static str],
    pub lesson: &'static str,
}

pub static STORY_SERIES: &[StorySeries] = &[
    StorySeries {
        id: "trex",
        name: "T-Rex Adventures",
        character: "T-Rex the friendly dinosaur",
        theme: "Geography and Swedish cities",
        stories: &[
            StoryEntry {
                id: "trex_stockholm",
                title: "T-Rex visits Stockholm",
                location: "Stockholm",
                highlights: &["Vasa Museum", "Gamla Stan", "Royal Palace"],
                lesson: "Learning about Swedish history and culture",
            },
            StoryEntry {
                id: "trex_gothenburg",
                title: "T-Rex in Gothenburg",
                location: "Gothenburg",
                highlights: &["Liseberg", "Harbor", "Fish Market"],
                lesson: "Exploring Sweden's second largest city",
            },
            StoryEntry {
                id: "trex_malmo",
                title: "T-Rex discovers Malmö",
                location: "Malmö",
                highlights: &["Turning Torso", "Öresund Bridge", "Malmöhus Castle"],
                lesson: "Understanding modern Swedish architecture",
            },
            StoryEntry {
                id: "trex_copenhagen",
                title: "T-Rex crosses to Copenhagen",
                location: "Copenhagen",
                highlights: &["Tivoli Gardens", "Little Mermaid", "Nyhavn"],
                lesson: "Learning about Denmark, Sweden's neighbor",
            },
        ],
    },
    StorySeries {
        id: "kanin",
        name: "Kanin and Friends",
        character: "Kanin the clever rabbit",
        theme: "Friendship and problem-solving",
        stories: &[
            StoryEntry {
                id: "kanin_forest",
                title: "Kanin in the Forest",
                location: "Swedish forest",
                highlights: &["Squirrel", "Hedgehog", "Owl"],
                lesson: "Teamwork and helping each other",
            },
            StoryEntry {
                id: "kanin_lake",
                title: "Kanin by the Lake",
                location: "Beautiful Swedish lake",
                highlights: &["Ducklings", "Frog", "Fish"],
                lesson: "Caring for those who are lost",
            },
            StoryEntry {
                id: "kanin_river",
                title: "Kanin at the River",
                location: "Flowing river",
                highlights: &["Beaver", "Otter", "Birds"],
                lesson: "Building things together",
            },
            StoryEntry {
                id: "kanin_sea",
                title: "Kanin's Beach Adventure",
                location: "Swedish coastline",
                highlights: &["Seagull", "Crab", "Seal"],
                lesson: "Exploring new places with friends",
            },
        ],
    },
    StorySeries {
        id: "delfin",
        name: "Delfin the Helper",
        character: "Delfin the kind dolphin",
        theme: "Helping others and ocean life",
        stories: &[
            StoryEntry {
                id: "delfin_fishermen",
                title: "Delfin helps the Fishermen",
                location: "Gothenburg harbor",
                highlights: &["Helping fishermen find fish"],
                lesson: "Working together and being helpful",
            },
            StoryEntry {
                id: "delfin_rescue",
                title: "Delfin's Brave Rescue",
                location: "Swedish west coast",
                highlights: &["Rescuing a child in the water"],
                lesson: "Being brave and helping in emergencies",
            },
            StoryEntry {
                id: "delfin_swimming",
                title: "Delfin teaches Swimming",
                location: "Safe swimming area",
                highlights: &["Teaching kids water safety"],
                lesson: "Learning to swim safely",
            },
            StoryEntry {
                id: "delfin_ocean",
                title: "Delfin cleans the Ocean",
                location: "Swedish waters",
                highlights: &["Cleaning plastic from the sea"],
                lesson: "Taking care of our environment",
            },
        ],
    },
];

/// Look up a series by id
pub fn series(series_id: &str) -> Option<&'static StorySeries> {
    STORY_SERIES.iter().find(|s| s.id == series_id)
}

/// Build the generation prompt for a story in the requested language
pub fn story_prompt(series_id: &str, story_id: &str, language: Language) -> Option<String> {
    let series = series(series_id)?;
    let story = series.stories.iter().find(|s| s.id == story_id)?;

    let prompt = match language {
        Language::Swedish => format!(
            "Skriv en rolig och lärorik barnberättelse (3-5 minuter lång) för barn 3-10 år.\n\n\
             Serie: {}\nHuvudkaraktär: {}\nTitel: {}\nPlats: {}\n\n\
             Tema: {}\nLäxa: {}\n\n\
             Inkludera:\n- Enkelt, varmt språk för barn\n- Spännande äventyr\n\
             - Positiv läxa\n- Lyckligt slut\n\n\
             Berättelsen ska vara engagerande, fantasifull och lämplig för barn.",
            series.name, series.character, story.title, story.location, series.theme, story.lesson
        ),
        Language::English => format!(
            "Write a fun and educational children's story (3-5 minutes long) for kids aged 3-10.\n\n\
             Series: {}\nMain Character: {}\nTitle: {}\nLocation: {}\n\n\
             Theme: {}\nLesson: {}\n\n\
             Include:\n- Simple, warm language for children\n- Exciting adventure\n\
             - Positive lesson\n- Happy ending\n\n\
             The story should be engaging, imaginative, and age-appropriate.",
            series.name, series.character, story.title, story.location, series.theme, story.lesson
        ),
    };

    Some(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shape() {
        assert_eq!(STORY_SERIES.len(), 3);
        for series in STORY_SERIES {
            assert_eq!(series.stories.len(), 4);
        }
    }

    #[test]
    fn series_lookup() {
        assert!(series("trex").is_some());
        assert!(series("dragon").is_none());
    }

    #[test]
    fn prompt_includes_story_metadata() {
        let prompt = story_prompt("kanin", "kanin_lake", Language::English).unwrap();
        assert!(prompt.contains("Kanin the clever rabbit"));
        assert!(prompt.contains("Kanin by the Lake"));
        assert!(prompt.contains("Caring for those who are lost"));
    }

    #[test]
    fn swedish_prompt_is_in_swedish() {
        let prompt = story_prompt("trex", "trex_stockholm", Language::Swedish).unwrap();
        assert!(prompt.contains("barnberättelse"));
        assert!(prompt.contains("Lyckligt slut"));
    }

    #[test]
    fn unknown_ids_return_none() {
        assert!(story_prompt("trex", "trex_mars", Language::English).is_none());
        assert!(story_prompt("nope", "trex_stockholm", Language::English).is_none());
    }
}
