//! Ollama backend
//!
//! Local model fallback via the Ollama chat API. Chat turns and story
//! generation run under different timeouts: a story takes the model well
//! past the conversational budget.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use plushpal_config::{personas, OllamaSettings};

use crate::backend::GenerationBackend;
use crate::LlmError;

pub struct OllamaBackend {
    client: Client,
    model: String,
    endpoint: String,
    chat_timeout: Duration,
    story_timeout: Duration,
}

impl OllamaBackend {
    pub fn new(settings: &OllamaSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            chat_timeout: Duration::from_secs(settings.timeout_secs),
            story_timeout: Duration::from_secs(settings.story_timeout_secs),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.endpoint, path)
    }

    async fn chat(
        &self,
        prompt: &str,
        system_instruction: &str,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.api_url("/chat"))
            .timeout(timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(response.message.content)
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        self.chat(prompt, system_instruction, self.chat_timeout).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(self.api_url("/tags"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn generate_story(&self, story_prompt: &str) -> Result<String, LlmError> {
        self.chat(
            story_prompt,
            personas::storybook_instruction(),
            self.story_timeout,
        )
        .await
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_building() {
        let backend = OllamaBackend::new(&OllamaSettings::default()).unwrap();
        assert_eq!(backend.api_url("/chat"), "http://localhost:11434/api/chat");
        assert_eq!(backend.model_name(), "llama3.1");
    }

    #[test]
    fn story_timeout_exceeds_chat_timeout() {
        let backend = OllamaBackend::new(&OllamaSettings::default()).unwrap();
        assert!(backend.story_timeout > backend.chat_timeout);
    }

    #[test]
    fn response_parsing() {
        let json = r#"{"message": {"role": "assistant", "content": "hi!"}, "done": true}"#;
        let parsed: OllamaChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.content, "hi!");
    }
}
