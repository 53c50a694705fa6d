//! Double-pass event decoding and shape classification.
//!
//! Each wire line is a JSON string literal wrapping a serialized JSON
//! object, so decoding unwraps the outer string and then parses the
//! content. Classification checks field presence in a fixed precedence
//! order because the producer does not guarantee the fields are mutually
//! exclusive.

use serde_json::Value;
use tracing::warn;

use crate::stream::events::{ChatEvent, DecodeError};
use crate::stream::payloads::{QuestionsPayload, SourcesPayload, TextPayload};

/// Decode one complete wire line into a typed event.
///
/// Both failure variants are recoverable; the caller retries with more
/// data appended to the line.
pub fn decode_event(raw: &str) -> Result<ChatEvent, DecodeError> {
    let inner: String = serde_json::from_str(raw).map_err(DecodeError::OuterString)?;
    let value: Value = serde_json::from_str(&inner).map_err(DecodeError::InnerJson)?;
    Ok(classify(value))
}

/// Classify a parsed payload by field presence.
///
/// Precedence: `top_sources`, then `text`, then `questions`. A payload
/// whose distinguishing field is present but malformed does not fall
/// through to a lower-precedence field; it is unrecognized.
fn classify(value: Value) -> ChatEvent {
    if let Some(obj) = value.as_object() {
        if obj.contains_key("top_sources") {
            if let Ok(payload) = serde_json::from_value::<SourcesPayload>(value.clone()) {
                return ChatEvent::Sources {
                    top_sources: payload.top_sources,
                };
            }
        } else if obj.contains_key("text") {
            if let Ok(payload) = serde_json::from_value::<TextPayload>(value.clone()) {
                return ChatEvent::Text { text: payload.text };
            }
        } else if obj.contains_key("questions") {
            if let Ok(payload) = serde_json::from_value::<QuestionsPayload>(value.clone()) {
                return ChatEvent::FollowUps {
                    questions: payload.questions,
                };
            }
        }
    }

    warn!(payload = %value, "unrecognized event shape in chat stream");
    ChatEvent::Unrecognized(value)
}

/// Encode a typed event back into its wire line form (without the trailing
/// newline). Inverse of [`decode_event`]; used by tests and fixtures.
pub fn encode_event(event: &ChatEvent) -> String {
    let inner = match event {
        ChatEvent::Sources { top_sources } => serde_json::json!({ "top_sources": top_sources }),
        ChatEvent::Text { text } => serde_json::json!({ "text": text }),
        ChatEvent::FollowUps { questions } => serde_json::json!({ "questions": questions }),
        ChatEvent::Unrecognized(value) => value.clone(),
    };
    Value::String(inner.to_string()).to_string()
}
