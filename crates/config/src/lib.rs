//! Configuration management for the plushpal backend
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, then `config/{env}`)
//! - Environment variables (`PLUSHPAL__` prefix, `__` separator)
//!
//! Fixed text policies that are configuration rather than code — the persona
//! system instructions and the locale-keyed fallback message tables — also
//! live here so they are resolved exactly once at startup.

pub mod fallbacks;
pub mod personas;
pub mod settings;

pub use fallbacks::{FallbackMessages, LocaleText};
pub use personas::{storybook_instruction, system_instruction};
pub use settings::{
    load_settings, AuthConfig, GeminiSettings, GroqSettings, LlmSettings, OllamaSettings,
    RuntimeEnvironment, ServerConfig, SessionConfig, Settings, SttSettings, TtsSettings,
    WeatherSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
