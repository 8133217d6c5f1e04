//! Generative study content and speech synthesis for kotoba
//!
//! Quiz questions, reading passages and conversation replies from a
//! Gemini-style endpoint, each degrading to a fixed fallback, plus cached
//! pronunciation audio.

mod ai_types;
mod client;
mod conversation;
mod error;
mod generator;
#[cfg(test)]
mod generator_tests;
mod question;
mod reading;
mod speech;
#[cfg(test)]
mod speech_tests;

pub use ai_types::GenerationConfig;
pub use client::{truncate, GenerativeClient, TextGenerator};
pub use conversation::ConversationReply;
pub use error::LlmError;
pub use generator::{Generated, StudyGenerator};
pub use question::{MultipleChoiceQuestion, OPTION_COUNT};
pub use reading::ReadingPassage;
pub use speech::{Pronouncer, SpeechClient};
