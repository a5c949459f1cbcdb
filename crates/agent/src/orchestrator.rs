//! The conversation orchestrator

use std::sync::Arc;

use plushpal_config::FallbackMessages;
use plushpal_core::{language, ContentFilter, Intent, Language, Message};
use plushpal_llm::GenerationBackend;
use plushpal_session::{SessionContext, SessionError, SessionStore};
use plushpal_speech::{SpeechToText, TextToSpeech};

use crate::turn::{TurnInput, TurnOutcome, TurnPhase, TurnRequest};
use crate::AgentError;

/// Orchestrates one conversation turn end to end
///
/// Every collaborator is injected at construction; the orchestrator owns no
/// connections and holds no locks. One instance is shared by all turns.
pub struct Orchestrator {
    generator: Arc<dyn GenerationBackend>,
    sessions: Arc<dyn SessionStore>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    filter: ContentFilter,
    fallbacks: FallbackMessages,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn GenerationBackend>,
        sessions: Arc<dyn SessionStore>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        filter: ContentFilter,
        fallbacks: FallbackMessages,
    ) -> Self {
        Self {
            generator,
            sessions,
            stt,
            tts,
            filter,
            fallbacks,
        }
    }

    /// Process one turn
    ///
    /// Only a failed transcription surfaces as an error; every other failure
    /// degrades to a fallback reply so the toy always answers.
    pub async fn converse(&self, request: TurnRequest) -> Result<TurnOutcome, AgentError> {
        let session_id = request.session_id.as_str();
        tracing::debug!(session_id, phase = ?TurnPhase::Received, "turn started");

        // Transcribe if the device sent raw audio. The STT-reported language
        // is authoritative over the keyword heuristic.
        let (transcript, reported_language) = match &request.input {
            TurnInput::Audio { bytes, sample_rate } => {
                let result = self.stt.transcribe(bytes, *sample_rate).await?;
                (result.text, result.language)
            }
            TurnInput::Text(text) => (text.clone(), None),
        };

        let detected = reported_language
            .or(request.language_hint)
            .unwrap_or_else(|| language::detect(&transcript));
        tracing::debug!(session_id, phase = ?TurnPhase::LanguageDetected, language = %detected, "language resolved");

        let context = self.load_context(session_id).await;
        tracing::debug!(
            session_id,
            phase = ?TurnPhase::ContextLoaded,
            messages = context.as_ref().map(|c| c.messages.len()).unwrap_or(0),
            "context loaded"
        );

        let (response_text, intent, errored) =
            self.generate(session_id, &transcript, detected, context.as_ref()).await;

        let response_text = self
            .filter
            .filter(&response_text, detected)
            .into_owned();
        tracing::debug!(session_id, phase = ?TurnPhase::Filtered, intent = %intent, "reply filtered");

        if !errored {
            self.persist(&request, &transcript, &response_text, intent).await;
        }

        tracing::debug!(session_id, phase = ?TurnPhase::Synthesizing, "synthesis started");
        let audio = self.synthesize(session_id, &response_text, detected).await;

        let phase = if errored { TurnPhase::Errored } else { TurnPhase::Done };
        tracing::debug!(session_id, phase = ?phase, has_audio = audio.is_some(), "turn complete");

        Ok(TurnOutcome {
            transcript,
            response_text,
            intent,
            language: detected,
            audio,
            phase,
        })
    }

    /// Explicitly start a session
    pub async fn start_session(
        &self,
        session_id: &str,
        device_id: &str,
    ) -> Result<SessionContext, SessionError> {
        self.sessions.create(session_id, device_id).await
    }

    /// Explicitly end a session
    pub async fn end_session(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.delete(session_id).await
    }

    /// Load session context; a missing session or an unreachable store both
    /// degrade to a stateless turn.
    async fn load_context(&self, session_id: &str) -> Option<SessionContext> {
        match self.sessions.get(session_id).await {
            Ok(Some(context)) => Some(context),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(session_id, error = %e, "session store unavailable, continuing stateless");
                None
            }
        }
    }

    /// Generate the reply; exhausted providers resolve to the confusion text
    async fn generate(
        &self,
        session_id: &str,
        transcript: &str,
        language: Language,
        context: Option<&SessionContext>,
    ) -> (String, Intent, bool) {
        tracing::debug!(session_id, phase = ?TurnPhase::Generating, "generation started");

        let window: Option<&[Message]> = context.map(|c| c.messages.as_slice());
        match self
            .generator
            .generate_conversation(transcript, language, window)
            .await
        {
            Ok((text, intent)) => (text, intent, false),
            Err(e) => {
                tracing::error!(session_id, error = %e, "all generation providers failed");
                (
                    self.fallbacks.generation.get(language).to_string(),
                    Intent::General,
                    true,
                )
            }
        }
    }

    /// Record the turn, creating the session on first contact. Best-effort:
    /// the reply is already determined, so failures are logged and dropped.
    async fn persist(
        &self,
        request: &TurnRequest,
        transcript: &str,
        response_text: &str,
        intent: Intent,
    ) {
        let session_id = request.session_id.as_str();

        let appended = match self
            .sessions
            .append_turn(session_id, transcript, response_text)
            .await
        {
            Ok(Some(_)) => true,
            Ok(None) => {
                match self.sessions.create(session_id, &request.device_id).await {
                    Ok(_) => self
                        .sessions
                        .append_turn(session_id, transcript, response_text)
                        .await
                        .map(|r| r.is_some())
                        .unwrap_or(false),
                    Err(e) => {
                        tracing::warn!(session_id, error = %e, "session create failed, turn not recorded");
                        false
                    }
                }
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "session update failed, turn not recorded");
                false
            }
        };

        // A story reply doubles as continuation context for the next turn.
        if appended && intent == Intent::Story {
            if let Err(e) = self.sessions.set_story(session_id, response_text).await {
                tracing::warn!(session_id, error = %e, "story context not stored");
            }
        }

        if appended {
            tracing::debug!(session_id, phase = ?TurnPhase::Persisted, "turn recorded");
        }
    }

    /// Synthesize the reply. On failure, try once to speak the locale's
    /// synthesis-fallback sentence; a text-only reply is the final fallback.
    async fn synthesize(
        &self,
        session_id: &str,
        response_text: &str,
        language: Language,
    ) -> Option<Vec<u8>> {
        match self.tts.synthesize_buffered(response_text, language).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "synthesis failed, trying fallback sentence");
                let fallback = self.fallbacks.synthesis.get(language);
                match self.tts.synthesize_buffered(fallback, language).await {
                    Ok(audio) => Some(audio),
                    Err(e) => {
                        tracing::warn!(session_id, error = %e, "fallback synthesis failed, returning text only");
                        None
                    }
                }
            }
        }
    }
}
