//! Provider factory
//!
//! Creates generation backends from configuration. Provider selection happens
//! here, at construction time — nothing downstream inspects concrete types.

use std::sync::Arc;

use plushpal_config::LlmSettings;

use crate::{
    backend::GenerationBackend, fallback::FallbackChain, gemini::GeminiBackend, groq::GroqBackend,
    ollama::OllamaBackend, LlmError,
};

/// Generation provider kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Hosted Gemini (primary)
    Gemini,
    /// Hosted Groq (fast fallback)
    Groq,
    /// Local Ollama (offline fallback)
    Ollama,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "groq" => Some(ProviderKind::Groq),
            "ollama" | "local" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }
}

/// Create a single backend for a provider kind
pub fn create_backend(
    kind: ProviderKind,
    settings: &LlmSettings,
) -> Result<Arc<dyn GenerationBackend>, LlmError> {
    let backend: Arc<dyn GenerationBackend> = match kind {
        ProviderKind::Gemini => Arc::new(GeminiBackend::new(&settings.gemini)?),
        ProviderKind::Groq => Arc::new(GroqBackend::new(&settings.groq)?),
        ProviderKind::Ollama => Arc::new(OllamaBackend::new(&settings.ollama)?),
    };
    Ok(backend)
}

/// Build the configured fallback chain
///
/// Providers that fail to construct (typically a missing API key) are skipped
/// with a warning so one unconfigured hosted backend never takes the whole
/// chain down. Errors only when no provider could be constructed.
pub fn create_chain(settings: &LlmSettings) -> Result<FallbackChain, LlmError> {
    let mut backends: Vec<Arc<dyn GenerationBackend>> = Vec::new();

    for name in &settings.providers {
        let Some(kind) = ProviderKind::from_str(name) else {
            return Err(LlmError::Configuration(format!(
                "unknown generation provider: {}",
                name
            )));
        };

        match create_backend(kind, settings) {
            Ok(backend) => {
                tracing::info!(provider = %name, model = backend.model_name(), "generation provider configured");
                backends.push(backend);
            }
            Err(e) => {
                tracing::warn!(provider = %name, error = %e, "skipping unconfigured generation provider");
            }
        }
    }

    FallbackChain::new(backends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plushpal_config::{GeminiSettings, GroqSettings};

    #[test]
    fn provider_kind_parsing() {
        assert_eq!(ProviderKind::from_str("gemini"), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::from_str("GROQ"), Some(ProviderKind::Groq));
        assert_eq!(ProviderKind::from_str("local"), Some(ProviderKind::Ollama));
        assert_eq!(ProviderKind::from_str("claude"), None);
    }

    #[test]
    fn unknown_provider_name_rejected() {
        let settings = LlmSettings {
            providers: vec!["quantum".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            create_chain(&settings),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn unconfigured_hosted_providers_are_skipped() {
        // no API keys, so only ollama (which needs none) survives
        let settings = LlmSettings {
            providers: vec!["gemini".to_string(), "groq".to_string(), "ollama".to_string()],
            gemini: GeminiSettings {
                api_key: None,
                ..Default::default()
            },
            groq: GroqSettings {
                api_key: None,
                ..Default::default()
            },
            ..Default::default()
        };
        let chain = create_chain(&settings).unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn empty_chain_is_an_error() {
        let settings = LlmSettings {
            providers: vec!["gemini".to_string()],
            gemini: GeminiSettings {
                api_key: None,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(create_chain(&settings).is_err());
    }
}
