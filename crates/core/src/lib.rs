//! Core types and pure text policies for the plushpal backend
//!
//! This crate provides the foundational pieces used across all other crates:
//! - Conversation types (roles, messages, intents, languages)
//! - Intent classification (keyword-based, bilingual)
//! - Language detection (keyword-frequency heuristic)
//! - Content safety filtering for child-appropriate replies
//!
//! Everything in here is deterministic and free of I/O so the policy modules
//! can be shared by every generation provider without drift.

pub mod conversation;
pub mod intent;
pub mod language;
pub mod safety;

pub use conversation::{Message, Role};
pub use intent::{classify, Intent};
pub use language::{detect, Language};
pub use safety::ContentFilter;
