//! Speech-to-text collaborator

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;

use plushpal_config::SttSettings;
use plushpal_core::Language;

use crate::SpeechError;

/// Result of a transcription
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub confidence: f32,
    /// Language reported by the transcription service, when it reports one.
    /// Authoritative over the keyword heuristic.
    pub language: Option<Language>,
}

/// Speech-to-text interface
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe raw audio bytes
    async fn transcribe(&self, audio: &[u8], sample_rate: u32) -> Result<Transcript, SpeechError>;
}

/// HTTP client for a whisper-style transcription server
pub struct HttpSpeechToText {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSpeechToText {
    pub fn new(settings: &SttSettings) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SpeechError::Transcription(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    async fn transcribe(&self, audio: &[u8], sample_rate: u32) -> Result<Transcript, SpeechError> {
        let part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("sample_rate", sample_rate.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Transcription(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            chars = payload.text.len(),
            language = payload.language.as_deref().unwrap_or("unreported"),
            "transcription received"
        );

        Ok(Transcript {
            text: payload.text.trim().to_string(),
            confidence: payload.confidence.unwrap_or(1.0),
            language: payload.language.as_deref().and_then(Language::from_code),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_with_optional_fields() {
        let full: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "hej där", "confidence": 0.93, "language": "sv"}"#)
                .unwrap();
        assert_eq!(full.text, "hej där");
        assert_eq!(full.language.as_deref(), Some("sv"));

        let minimal: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(minimal.confidence.is_none());
        assert!(minimal.language.is_none());
    }

    #[test]
    fn reported_language_maps_to_enum() {
        assert_eq!(Language::from_code("sv"), Some(Language::Swedish));
        assert_eq!(Language::from_code("xx"), None);
    }
}
