//! Chat stream event types and decode errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Source;

/// A fully decoded event from the chat stream.
///
/// The wire format carries no discriminant field; events are classified by
/// which field is present, in a fixed precedence order (see
/// [`crate::stream::decode_event`]). Payloads the classifier does not
/// recognize are passed through as [`ChatEvent::Unrecognized`] so that new
/// backend event shapes never abort an in-flight stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ChatEvent {
    /// Document citations for the answer, replacing any earlier set
    Sources { top_sources: Vec<Source> },
    /// An incremental piece of the answer text, meant to be appended.
    /// `None` is a valid delta carrying no text (the backend sends it as
    /// the final chunk).
    Text { text: Option<String> },
    /// Suggested follow-up questions
    FollowUps { questions: Vec<String> },
    /// Structurally valid JSON that matches none of the known shapes
    Unrecognized(serde_json::Value),
}

impl ChatEvent {
    /// Returns the event kind as a string for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::Sources { .. } => "sources",
            ChatEvent::Text { .. } => "text",
            ChatEvent::FollowUps { .. } => "follow_ups",
            ChatEvent::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Errors from decoding a single candidate event.
///
/// Both variants are recoverable: the assembler keeps the candidate text
/// as carry and retries once more data arrives.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The line is not a complete JSON string literal
    #[error("outer string layer incomplete or malformed: {0}")]
    OuterString(#[source] serde_json::Error),

    /// The unwrapped content is not valid JSON
    #[error("inner payload is not valid JSON: {0}")]
    InnerJson(#[source] serde_json::Error),
}
