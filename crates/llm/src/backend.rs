//! The generation backend trait

use async_trait::async_trait;

use plushpal_config::personas;
use plushpal_core::{classify, Intent, Language, Message};

use crate::prompt::conversation_prompt;
use crate::LlmError;

/// A text-generation backend
///
/// Each implementation wraps one remote service with its own model id,
/// request shape, and error surface, but all expose the same operations.
/// The conversational operations are provided methods so the intent policy,
/// persona selection, and prompt shape cannot drift between providers.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a prompt under a system instruction
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;

    /// Check whether the backing service is reachable
    async fn is_available(&self) -> bool {
        true
    }

    /// Generate a conversational reply for a child's utterance
    ///
    /// Intent is always classified locally — the remote model produces
    /// conversational text only and its output never influences the returned
    /// [`Intent`]. When context is supplied, the last few turns are prepended
    /// to the prompt as a labeled block.
    async fn generate_conversation(
        &self,
        utterance: &str,
        language: Language,
        context: Option<&[Message]>,
    ) -> Result<(String, Intent), LlmError> {
        let intent = classify(utterance);
        let prompt = conversation_prompt(utterance, context);
        let reply = self
            .generate(&prompt, personas::system_instruction(language))
            .await?;
        Ok((reply, intent))
    }

    /// Generate a long-form story under the storybook narrator instruction
    async fn generate_story(&self, story_prompt: &str) -> Result<String, LlmError> {
        self.generate(story_prompt, personas::storybook_instruction())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canned backend used to exercise the provided methods
    struct Canned(&'static str);

    #[async_trait]
    impl GenerationBackend for Canned {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn conversation_classifies_intent_locally() {
        let backend = Canned("Sunny and warm, perfect for playing outside!");
        let (reply, intent) = backend
            .generate_conversation("what's the weather?", Language::English, None)
            .await
            .unwrap();
        assert_eq!(intent, Intent::Weather);
        assert!(reply.contains("Sunny"));
    }

    #[tokio::test]
    async fn model_reply_never_drives_intent() {
        // the canned reply mentions a story, the utterance does not
        let backend = Canned("Once upon a time there was a story.");
        let (_, intent) = backend
            .generate_conversation("hello there", Language::English, None)
            .await
            .unwrap();
        assert_eq!(intent, Intent::General);
    }
}
