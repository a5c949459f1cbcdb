//! External lookups and static catalogs
//!
//! Thin typed wrappers around single external calls (weather) plus the pure
//! data catalog of curated story prompts.

pub mod stories;
pub mod weather;

pub use stories::{series, story_prompt, StoryEntry, StorySeries, STORY_SERIES};
pub use weather::{WeatherClient, WeatherReport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("weather lookup failed: {0}")]
    Weather(String),

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Network(err.to_string())
    }
}
