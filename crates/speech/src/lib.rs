//! Speech collaborator clients
//!
//! Transcription and synthesis are external capabilities with a narrow
//! contract: audio bytes in, text out; text in, audio chunks out. This crate
//! holds the trait seams the orchestrator depends on plus thin HTTP client
//! implementations. No audio processing happens in-process.

pub mod stt;
pub mod tts;

pub use stt::{HttpSpeechToText, SpeechToText, Transcript};
pub use tts::{AudioStream, HttpTextToSpeech, TextToSpeech};

use thiserror::Error;

/// Speech collaborator errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Network(err.to_string())
    }
}
