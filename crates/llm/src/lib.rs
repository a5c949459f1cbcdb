//! Generation provider abstraction
//!
//! Every response the toy speaks comes from one of three interchangeable
//! text-generation backends (Gemini, Groq, Ollama), selected and ordered by
//! configuration. The trait carries the conversational contract — local
//! intent classification, persona selection, bounded context window — so the
//! backends stay thin wire wrappers.

pub mod backend;
pub mod fallback;
pub mod factory;
pub mod gemini;
pub mod groq;
pub mod ollama;
pub mod prompt;

pub use backend::GenerationBackend;
pub use fallback::FallbackChain;
pub use factory::{create_backend, create_chain, ProviderKind};
pub use gemini::GeminiBackend;
pub use groq::GroqBackend;
pub use ollama::OllamaBackend;
pub use prompt::conversation_prompt;

use thiserror::Error;

/// Generation errors
///
/// All transport and backend failures are mapped into this type; callers
/// never see a backend's own error surface.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out")]
    Timeout,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
