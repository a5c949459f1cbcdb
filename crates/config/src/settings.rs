//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::fallbacks::FallbackMessages;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Device token configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Session store configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Generation provider configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Speech-to-text collaborator
    #[serde(default)]
    pub stt: SttSettings,

    /// Text-to-speech collaborator
    #[serde(default)]
    pub tts: TtsSettings,

    /// Weather collaborator
    #[serde(default)]
    pub weather: WeatherSettings,

    /// Locale-keyed fallback texts, resolved once at startup
    #[serde(default)]
    pub fallbacks: FallbackMessages,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

/// Device token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing key for device tokens
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Access token lifetime in minutes
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token lifetime in days
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Shared provisioning secret devices must present. When unset, any
    /// credential pair is accepted (development posture).
    #[serde(default)]
    pub device_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            device_secret: None,
        }
    }
}

fn default_secret_key() -> String {
    std::env::var("PLUSHPAL_SECRET_KEY")
        .unwrap_or_else(|_| "change-me-in-production".to_string())
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    30
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Redis connection URL; in-memory fallback when unset
    #[serde(default = "default_redis_url")]
    pub redis_url: Option<String>,
    /// Sliding session lifetime in minutes
    #[serde(default = "default_session_ttl")]
    pub ttl_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_redis_url() -> Option<String> {
    std::env::var("REDIS_URL").ok()
}

fn default_session_ttl() -> u64 {
    30
}

/// Generation provider configuration
///
/// `providers` is the fallback order; each entry names a configured backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub groq: GroqSettings,
    #[serde(default)]
    pub ollama: OllamaSettings,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            gemini: GeminiSettings::default(),
            groq: GroqSettings::default(),
            ollama: OllamaSettings::default(),
        }
    }
}

fn default_providers() -> Vec<String> {
    vec!["gemini".to_string(), "groq".to_string(), "ollama".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API key; falls back to GOOGLE_API_KEY
    #[serde(default = "default_gemini_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: default_gemini_key(),
            model: default_gemini_model(),
            endpoint: default_gemini_endpoint(),
            timeout_secs: default_remote_timeout(),
        }
    }
}

fn default_gemini_key() -> Option<String> {
    std::env::var("GOOGLE_API_KEY").ok()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_remote_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqSettings {
    /// API key; falls back to GROQ_API_KEY
    #[serde(default = "default_groq_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_groq_model")]
    pub model: String,
    #[serde(default = "default_groq_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            api_key: default_groq_key(),
            model: default_groq_model(),
            endpoint: default_groq_endpoint(),
            timeout_secs: default_remote_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_groq_key() -> Option<String> {
    std::env::var("GROQ_API_KEY").ok()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    /// Conversational turn timeout
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
    /// Story generation runs much longer than a chat turn
    #[serde(default = "default_story_timeout")]
    pub story_timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_ollama_model(),
            timeout_secs: default_remote_timeout(),
            story_timeout_secs: default_story_timeout(),
        }
    }
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1".to_string()
}

fn default_story_timeout() -> u64 {
    60
}

/// Speech-to-text collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSettings {
    #[serde(default = "default_stt_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            endpoint: default_stt_endpoint(),
            timeout_secs: default_remote_timeout(),
        }
    }
}

fn default_stt_endpoint() -> String {
    "http://localhost:8091/transcribe".to_string()
}

/// Text-to-speech collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSettings {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
    /// Voice id per locale
    #[serde(default = "default_swedish_voice")]
    pub swedish_voice: String,
    #[serde(default = "default_english_voice")]
    pub english_voice: String,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            timeout_secs: default_remote_timeout(),
            swedish_voice: default_swedish_voice(),
            english_voice: default_english_voice(),
        }
    }
}

fn default_tts_endpoint() -> String {
    "http://localhost:8092/synthesize".to_string()
}

fn default_swedish_voice() -> String {
    "sv-SE-HilleviNeural".to_string()
}

fn default_english_voice() -> String {
    "en-US-JennyNeural".to_string()
}

/// Weather collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_location")]
    pub default_location: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            timeout_secs: default_weather_timeout(),
            default_location: default_location(),
        }
    }
}

fn default_weather_endpoint() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_location() -> String {
    "stockholm".to_string()
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings after load
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.ttl_minutes".to_string(),
                message: "session TTL must be at least one minute".to_string(),
            });
        }

        if self.llm.providers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.providers".to_string(),
                message: "at least one generation provider must be configured".to_string(),
            });
        }

        if self.auth.access_ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.access_ttl_minutes".to_string(),
                message: "access tokens must have a non-zero lifetime".to_string(),
            });
        }

        if self.environment.is_production() && self.auth.secret_key == "change-me-in-production" {
            return Err(ConfigError::InvalidValue {
                field: "auth.secret_key".to_string(),
                message: "default signing key is not allowed in production".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from configuration files and environment
///
/// Priority: env vars > config/{env} > config/default > built-in defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    let raw = builder
        .add_source(Environment::with_prefix("PLUSHPAL").separator("__"))
        .build()?;

    let settings: Settings = raw.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
