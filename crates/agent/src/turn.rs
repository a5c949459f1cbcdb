//! Per-turn types for the orchestrator

use plushpal_core::{Intent, Language};

/// Stages a turn moves through
///
/// Purely per-turn, never persisted. `Errored` is the absorbing state for a
/// generation failure with no usable fallback; even then the device receives
/// a fixed reply rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Received,
    LanguageDetected,
    ContextLoaded,
    Generating,
    Filtered,
    Persisted,
    Synthesizing,
    Done,
    Errored,
}

/// Input for one turn: raw device audio or already-transcribed text
#[derive(Debug, Clone)]
pub enum TurnInput {
    Audio { bytes: Vec<u8>, sample_rate: u32 },
    Text(String),
}

/// One inbound conversation turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub session_id: String,
    pub device_id: String,
    pub input: TurnInput,
    /// Caller-supplied language, overriding the heuristic detector
    pub language_hint: Option<Language>,
}

/// Result of one turn
#[derive(Debug)]
pub struct TurnOutcome {
    /// What the child said (transcribed or passed through)
    pub transcript: String,
    /// What the toy replies
    pub response_text: String,
    pub intent: Intent,
    pub language: Language,
    /// Synthesized reply audio; `None` when synthesis was unavailable
    pub audio: Option<Vec<u8>>,
    /// Terminal phase: `Done`, or `Errored` when generation fell back
    pub phase: TurnPhase,
}
