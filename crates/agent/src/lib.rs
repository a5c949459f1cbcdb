//! Conversation orchestration
//!
//! The heart of the backend: routes one utterance through transcription,
//! language detection, session context, generation with provider fallback,
//! content filtering, persistence, and synthesis, degrading gracefully at
//! every stage. The device always gets a child-appropriate reply; the only
//! failure that propagates is an unusable transcription.

pub mod orchestrator;
pub mod turn;

pub use orchestrator::Orchestrator;
pub use turn::{TurnInput, TurnOutcome, TurnPhase, TurnRequest};

use thiserror::Error;

/// Orchestration errors that reach the caller
///
/// Everything else — store outages, provider failures, synthesis failures —
/// is absorbed inside the orchestrator and degrades to a fallback reply.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] plushpal_speech::SpeechError),
}
