//! Text-to-speech collaborator

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;

use plushpal_config::TtsSettings;
use plushpal_core::Language;

use crate::SpeechError;

/// Stream of synthesized audio chunks
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, SpeechError>> + Send>>;

/// Text-to-speech interface
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text into a stream of audio chunks
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioStream, SpeechError>;

    /// Buffering variant: concatenate the stream into one blob
    async fn synthesize_buffered(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Vec<u8>, SpeechError> {
        let mut stream = self.synthesize(text, language).await?;
        let mut audio = Vec::new();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }
        Ok(audio)
    }
}

/// HTTP client for a streaming synthesis server
pub struct HttpTextToSpeech {
    client: Client,
    endpoint: String,
    timeout: Duration,
    swedish_voice: String,
    english_voice: String,
}

impl HttpTextToSpeech {
    pub fn new(settings: &TtsSettings) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SpeechError::Synthesis(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            swedish_voice: settings.swedish_voice.clone(),
            english_voice: settings.english_voice.clone(),
        })
    }

    /// Voice id for a locale
    fn voice(&self, language: Language) -> &str {
        match language {
            Language::Swedish => &self.swedish_voice,
            Language::English => &self.english_voice,
        }
    }
}

#[async_trait]
impl TextToSpeech for HttpTextToSpeech {
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioStream, SpeechError> {
        let request = SynthesisRequest {
            text,
            voice: self.voice(language),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Synthesis(format!("HTTP {}: {}", status, body)));
        }

        tracing::debug!(voice = self.voice(language), chars = text.len(), "synthesis started");

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| SpeechError::Synthesis(e.to_string())));

        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_selected_by_language() {
        let tts = HttpTextToSpeech::new(&TtsSettings::default()).unwrap();
        assert_eq!(tts.voice(Language::Swedish), "sv-SE-HilleviNeural");
        assert_eq!(tts.voice(Language::English), "en-US-JennyNeural");
    }

    #[tokio::test]
    async fn buffered_variant_concatenates_chunks() {
        struct Chunked;

        #[async_trait]
        impl TextToSpeech for Chunked {
            async fn synthesize(
                &self,
                _text: &str,
                _language: Language,
            ) -> Result<AudioStream, SpeechError> {
                let stream = async_stream::stream! {
                    yield Ok(Bytes::from_static(b"abc"));
                    yield Ok(Bytes::from_static(b"def"));
                };
                Ok(Box::pin(stream))
            }
        }

        let audio = Chunked
            .synthesize_buffered("hello", Language::English)
            .await
            .unwrap();
        assert_eq!(audio, b"abcdef");
    }

    #[tokio::test]
    async fn buffered_variant_propagates_mid_stream_errors() {
        struct Broken;

        #[async_trait]
        impl TextToSpeech for Broken {
            async fn synthesize(
                &self,
                _text: &str,
                _language: Language,
            ) -> Result<AudioStream, SpeechError> {
                let stream = async_stream::stream! {
                    yield Ok(Bytes::from_static(b"abc"));
                    yield Err(SpeechError::Synthesis("connection reset".to_string()));
                };
                Ok(Box::pin(stream))
            }
        }

        assert!(Broken
            .synthesize_buffered("hello", Language::English)
            .await
            .is_err());
    }
}
